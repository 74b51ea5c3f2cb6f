//! Headless run of the hanging sheet: let it swing, tug a corner, let go.
//!
//! `RUST_LOG=debug cargo run --example hang`

use drape::{ClothMesh, ClothSim, PointerEvent, Ray, Session, SimConfig};
use glam::Vec3;
use log::info;

const FRAME: f32 = 1.0 / 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut sim = ClothSim::new(ClothMesh::hanging_sheet(), SimConfig::default())?;
    let center = sim.hang_to_air();
    // Give it a wave on start: particle 50 is row 4, column 6.
    sim.add_velocity(50, Vec3::ONE);

    let mut session = Session::new(sim);
    session.toggle_running();

    for _ in 0..120 {
        session.tick(FRAME);
    }
    report(&session, "after 2s");

    let eye = Vec3::new(0.0, 1.0, -1.0);
    let ray = Ray::new(eye, center - eye);
    session.handle(PointerEvent::Down(ray));
    match session.interaction().grabbed_particle() {
        Some(p) => info!("holding particle {}", p),
        None => info!("missed the cloth"),
    }

    for frame in 0..60 {
        let target = center + Vec3::new(0.3 * frame as f32 / 60.0, 0.0, 0.0);
        session.handle(PointerEvent::Move(Ray::new(eye, target - eye)));
        session.tick(FRAME);
    }
    session.handle(PointerEvent::Up);
    report(&session, "after drag");

    for _ in 0..120 {
        session.tick(FRAME);
    }
    report(&session, "settled");

    Ok(())
}

fn report(session: &Session, label: &str) {
    let bounds = session.sim().surface().bounds();
    info!(
        "{}: bounds center {} radius {:.3}, stretch error {:.2e}",
        label,
        bounds.center,
        bounds.radius,
        session.sim().stretch_error()
    );
}

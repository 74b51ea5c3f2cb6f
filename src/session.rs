//! The state an app drives each frame: the cloth, whether it is running, and
//! the pointer grab.
//!
//! Once wrapped, the cloth is only changed through stepping, the grab and
//! reset. Pin or kick it before handing it over.

use log::debug;

use crate::{
    cloth::ClothSim,
    interaction::{InteractionController, Ray},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Ray),
    Move(Ray),
    Up,
}

#[derive(Debug, Clone)]
pub struct Session {
    sim: ClothSim,
    running: bool,
    interaction: InteractionController,
}

impl Session {
    /// Starts paused.
    pub fn new(sim: ClothSim) -> Self {
        Self {
            sim,
            running: false,
            interaction: InteractionController::new(),
        }
    }

    pub fn sim(&self) -> &ClothSim {
        &self.sim
    }

    /// Releases any grab and hands the cloth back.
    pub fn into_sim(mut self) -> ClothSim {
        self.end_grab();
        self.sim
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        debug!("running: {}", self.running);
        self.running
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Steps the cloth by `delta` if running. Returns whether it stepped.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.running {
            self.sim.step(delta);
        }
        self.running
    }

    /// Grabs the particle nearest to where `ray` hits the cloth and starts
    /// the simulation if it was paused.
    pub fn begin_grab(&mut self, ray: &Ray) -> Option<usize> {
        let hit = self.sim.raycast(ray);
        let grabbed = self
            .interaction
            .begin_grab(self.sim.particles_mut(), ray, hit);
        if grabbed.is_some() && !self.running {
            self.toggle_running();
        }
        grabbed
    }

    pub fn drag(&mut self, ray: &Ray) -> bool {
        self.interaction.drag(self.sim.particles_mut(), ray)
    }

    pub fn end_grab(&mut self) -> Option<usize> {
        self.interaction.end_grab(self.sim.particles_mut())
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(ray) => {
                self.begin_grab(&ray);
            }
            PointerEvent::Move(ray) => {
                self.drag(&ray);
            }
            PointerEvent::Up => {
                self.end_grab();
            }
        }
    }

    /// Releases any grab and puts the cloth back in its rest pose. The
    /// running flag is kept.
    pub fn reset(&mut self) {
        self.end_grab();
        self.sim.reset();
    }
}

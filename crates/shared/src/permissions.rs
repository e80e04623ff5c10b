//! Ownership based authorization shared by every route that touches another
//! record on behalf of the caller.

use crate::{
    model::{Exercise, ExerciseProgram, Profile, TrainingSession},
    types::Uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Access::Allow
    }
}

/// A record that belongs to exactly one user
pub trait Owned {
    fn owner_id(&self) -> &Uuid;
}

/// Only the owner may act on a resource. Every action currently has the same
/// requirement.
pub fn authorize<R: Owned + ?Sized>(actor: &Uuid, resource: &R, _action: Action) -> Access {
    if resource.owner_id() == actor {
        Access::Allow
    } else {
        Access::Deny
    }
}

impl Owned for Profile {
    fn owner_id(&self) -> &Uuid {
        &self.user_id
    }
}

impl Owned for Exercise {
    fn owner_id(&self) -> &Uuid {
        &self.user_id
    }
}

impl Owned for ExerciseProgram {
    fn owner_id(&self) -> &Uuid {
        &self.user_id
    }
}

impl Owned for TrainingSession {
    fn owner_id(&self) -> &Uuid {
        &self.user_id
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CyclotraceError {
    #[error("Unknown radar naming convention tag: {0}")]
    UnknownNamingConvention(String),

    #[error("Sweep index {0} is out of bounds for this volume")]
    SweepIndexOutOfBounds(usize),

    #[error("Ray index {0} is out of bounds for this volume")]
    RayIndexOutOfBounds(usize),

    #[error("No sweep in this volume carries velocity gates")]
    NoVelocitySweep,

    #[error("Velocity field contains no valid gates (all entries are the missing sentinel)")]
    EmptyVelocityField,

    #[error("Velocity field too small for center analysis: {rays} rays x {gates} gates")]
    DegenerateSweep { rays: usize, gates: usize },

    #[error("Singular value decomposition of the velocity field did not converge")]
    SvdFailed,
}

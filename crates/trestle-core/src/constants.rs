/// Trestle system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Envelope schema version emitted by generated scripts.
pub const ENVELOPE_VERSION: &str = "3";

/// Hard ceiling on the interpreted-tier iteration cap, whatever the config says.
pub const MAX_ITERATION_CAP: usize = 50_000;

/// Hard ceiling on generated program text, whatever the config says.
///
/// The automation target rejects larger programs outright, so raising the
/// configured limit past this only moves the failure to the other side of
/// the process boundary.
pub const MAX_SCRIPT_BYTES: usize = 1_000_000;

/// Minutes at or below which a task counts as a "short estimate" for scoring.
pub const SHORT_ESTIMATE_MINUTES: u32 = 15;

//! Precondition violations raised before any tick is scheduled.

use std::time::Duration;

/// Rejected ticker configuration.
///
/// Every variant is reported synchronously by the spec constructors; a
/// rejected spec never reaches a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TickerError {
  /// The timer step must be a non-zero duration.
  #[error("step duration must be non-zero")]
  ZeroStep,
  /// The timer step must be strictly shorter than the total run time.
  #[error("step time ({step:?}) must be < than end time ({end:?})")]
  StepExceedsEnd { end: Duration, step: Duration },
  /// A countdown step must be at least 1.
  #[error("step must be positive but it was {0}")]
  NonPositiveStep(i64),
  /// Countdown start and end describe an empty range.
  #[error("start != end required but both were {0}")]
  EmptyRange(i64),
  /// The countdown step does not fit into the counted range.
  #[error("step {step} is bigger than the time span {span}")]
  StepExceedsSpan { step: i64, span: i64 },
}

pub mod guard;
pub mod session;
pub mod notice;
pub mod history;
pub mod view;
pub mod dialog;

pub use guard::{MinimumDurationGuard, PLANNING_FLOOR};
pub use session::{Phase, SessionError, SubmissionSession, Transition};
pub use notice::{Notice, NoticeKind, Notifier, TracingNotifier};
pub use history::{IncidentalCleanupError, NavigationHistory, NoHistory};
pub use view::{DialogView, Overlay, OverlayView, PrimaryAction};
pub use dialog::{DialogError, DialogEvent, SubmitOutcome, TripDialog, TripDialogBuilder, SUCCESS_DWELL};

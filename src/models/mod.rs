pub mod attachment;
pub mod confirm;
pub mod evaluation;
pub mod finance;
pub mod reminder;
pub mod status;
pub mod supplier;
pub mod task;
pub mod user;

pub use attachment::{Attachment, AttachmentSet, UploadContext};
pub use confirm::PendingConfirmation;
pub use evaluation::{Distribution, Evaluation, EvaluationStatus, EvaluationType};
pub use finance::{FinanceOverview, SettlementStatus, TaskRecord};
pub use status::TaskStatus;
pub use supplier::{ProfileField, ProjectField, ReviewStatus, SupplierDocument, SupplierProfile};
pub use task::{Task, TaskAction, TaskActionKind};
pub use user::{Role, User, UserForm, UserStatus};

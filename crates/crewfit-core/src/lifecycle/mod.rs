//! Lifecycle - project / phase の純粋な状態遷移
//!
//! - **transitions**: status 変更と startDate / endDate の導出、save 時の合成
//! - **phases**: phase の編集と完了トグル
//!
//! どちらも total function（構造的に正しい入力に対して失敗しない）で、
//! 新しい Project を返します。store への書き込みは app::service が行います。

pub mod phases;
pub mod transitions;

pub use self::phases::{PhaseField, edit_phase, toggle_phase};
pub use self::transitions::{apply_status_change, commit_draft, derive_dates, select_candidate};

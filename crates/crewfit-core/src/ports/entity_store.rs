//! EntityStore port - People / Projects の正本（source of truth）
//!
//! core はこの port を black box として扱い、部分書き込みはしません。
//! すべての変更は「現状を読む → 次を計算 → 次を丸ごと書く」です。
//!
//! # 実装
//! - **InMemoryEntityStore**（impls）: セッション内のメモリ保持
//! - 永続化は外部の collaborator の責務

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Person, Project, ProjectId, StoreError};

/// People と Projects のひとそろい（bootstrap の seed もこの形）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Snapshot {
    pub fn new(people: Vec<Person>, projects: Vec<Project>) -> Self {
        Self { people, projects }
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.projects.is_empty()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Replace the project with the same id. Returns `false` if it is absent.
    pub fn replace_project(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => {
                *slot = project;
                true
            }
            None => false,
        }
    }
}

/// EntityStore は読み出しと丸ごと置換だけを公開
///
/// # 設計原則
/// - 書き込みは snapshot 全体の置換（途中状態は見えない）
/// - 書き手は一度に一人（ProjectService が直列化する）
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn load_all(&self) -> Result<Snapshot, StoreError>;

    async fn replace_all(&self, snapshot: Snapshot) -> Result<(), StoreError>;
}

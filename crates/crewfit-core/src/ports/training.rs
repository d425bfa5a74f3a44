//! TrainingCatalog port - スキル名から学習リソースの URL を引く
//!
//! missing skills の表示を飾るためだけに参照します。見つからなくてもエラーではありません。

/// TrainingCatalog は純粋な読み出し
pub trait TrainingCatalog: Send + Sync {
    fn lookup(&self, skill: &str) -> Option<String>;
}

/// 何も返さない catalog（設定が無いとき用）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraining;

impl TrainingCatalog for NoTraining {
    fn lookup(&self, _skill: &str) -> Option<String> {
        None
    }
}

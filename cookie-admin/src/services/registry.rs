//! Cookie列表注册表
//!
//! 远端列表在内存中的唯一副本。只暴露两种变更: 整表替换与单条替换。
//! 每次变更都构造新的不可变切片再整体换入,读者拿到的快照要么是变更前,
//! 要么是变更后,不存在中间态。

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{CookieRecord, RegistryError};

/// 只读快照
pub type RegistrySnapshot = Arc<[CookieRecord]>;

/// Cookie注册表
///
/// 不变量: 任一时刻同一账号最多一条记录。
pub struct CookieRegistry {
    records: RwLock<RegistrySnapshot>,
}

impl CookieRegistry {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// 整表替换
    ///
    /// 保持服务端返回的顺序,不排序不去重。
    /// 输入中出现重复账号时拒绝替换,注册表保持原样。
    ///
    /// # 返回值
    /// 替换后的记录条数
    pub fn replace_all(&self, records: Vec<CookieRecord>) -> Result<usize, RegistryError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.account_id.as_str()) {
                tracing::warn!(
                    account_id = %record.account_id,
                    "整表替换被拒绝: 账号重复"
                );
                return Err(RegistryError::DuplicateAccount {
                    account_id: record.account_id.clone(),
                });
            }
        }

        let count = records.len();
        let next: RegistrySnapshot = Arc::from(records);
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = next;

        tracing::debug!(count = count, "注册表整表替换完成");
        Ok(count)
    }

    /// 单条替换
    ///
    /// 只替换 `index` 处的记录,其余记录及顺序不变。
    /// `index` 处必须仍是同一账号,否则说明调用方持有的是旧快照的下标,拒绝替换。
    /// 由于整表唯一,同账号替换不会产生重复。
    pub fn splice_at(&self, index: usize, record: CookieRecord) -> Result<(), RegistryError> {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);

        let current = guard.get(index).ok_or(RegistryError::IndexOutOfRange {
            index,
            len: guard.len(),
        })?;
        if current.account_id != record.account_id {
            tracing::warn!(
                index = index,
                expected = %record.account_id,
                found = %current.account_id,
                "单条替换被拒绝: 下标已过期"
            );
            return Err(RegistryError::AccountMismatch {
                index,
                expected: record.account_id,
                found: current.account_id.clone(),
            });
        }

        let mut next = guard.to_vec();
        next[index] = record;
        *guard = Arc::from(next);

        tracing::debug!(index = index, "注册表单条替换完成");
        Ok(())
    }

    /// 当前快照
    pub fn snapshot(&self) -> RegistrySnapshot {
        Arc::clone(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按账号查找下标
    pub fn position(&self, account_id: &str) -> Option<usize> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .position(|r| r.account_id == account_id)
    }
}

impl Default for CookieRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! 文件集合与顺序
//!
//! `FileOrder` 同时持有 Registry（id → 描述）和 Order（id 序列）。
//! 只能通过 `apply_upload` / `move_up` / `move_down` / `remove` 修改，
//! 保证 Order 始终是 Registry id 集合的一个排列。

use crate::models::FileDescriptor;
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct FileOrder {
    registry: HashMap<String, FileDescriptor>,
    order: Vec<String>,
}

impl FileOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用后端返回的描述整体替换，顺序与返回顺序一致
    ///
    /// 重复的 id 只保留第一次出现的条目
    pub fn apply_upload(&mut self, descriptors: Vec<FileDescriptor>) {
        self.registry.clear();
        self.order.clear();

        for descriptor in descriptors {
            if self.registry.contains_key(&descriptor.id) {
                warn!("后端返回了重复的文件ID {}，已忽略: {}", descriptor.id, descriptor.name);
                continue;
            }
            self.order.push(descriptor.id.clone());
            self.registry.insert(descriptor.id.clone(), descriptor);
        }
    }

    /// 与前一个元素交换；index 为 0 或越界时不做任何事
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.order.len() {
            self.order.swap(index - 1, index);
        }
    }

    /// 与后一个元素交换；index 为最后一个或越界时不做任何事
    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.order.len() {
            self.order.swap(index, index + 1);
        }
    }

    /// 删除文件，其余文件相对顺序不变；id 不存在时不做任何事
    pub fn remove(&mut self, id: &str) -> Option<FileDescriptor> {
        let removed = self.registry.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.registry.clear();
        self.order.clear();
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, id: &str) -> Option<&FileDescriptor> {
        self.registry.get(id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|existing| existing == id)
    }

    /// 按当前顺序排列的描述
    pub fn ordered(&self) -> Vec<FileDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.registry.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Order 是否恰好是 Registry id 集合的一个排列
    pub fn is_consistent(&self) -> bool {
        let unique: HashSet<&String> = self.order.iter().collect();
        unique.len() == self.order.len()
            && self.order.len() == self.registry.len()
            && self.order.iter().all(|id| self.registry.contains_key(id))
    }
}

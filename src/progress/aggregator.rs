use std::collections::{HashMap, HashSet};

use super::ProgressRecord;

/// 식별자마다 한 줄을 유지하는 진행 메시지 집계기
///
/// 식별자의 줄 위치는 처음 등장한 순서로 고정되고, 내용은 마지막 메시지로 갱신된다.
/// pull/push/build 한 번에 하나씩 생성해서 쓰고 버린다.
#[derive(Debug, Default)]
pub struct MessageAggregator {
    order: Vec<String>,
    latest: HashMap<String, String>,
    seen: HashSet<String>,
}

impl MessageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 반영하고 현재까지의 전체 화면을 돌려준다.
    ///
    /// 식별자가 없는 레코드는 상태를 건드리지 않고 메시지를 그대로 돌려준다.
    pub fn append<R: ProgressRecord + ?Sized>(&mut self, record: &R) -> String {
        if !record.has_id() {
            return record.message();
        }

        let id = record.id();
        if !self.seen.contains(id) {
            self.order.push(id.to_string());
            self.seen.insert(id.to_string());
        }
        self.latest.insert(id.to_string(), record.message());

        self.render()
    }

    fn render(&self) -> String {
        self.order
            .iter()
            .filter_map(|id| self.latest.get(id).map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 현재 화면의 줄 수
    pub fn line_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 처음 등장한 순서의 식별자 목록
    pub fn ids(&self) -> &[String] {
        &self.order
    }
}

use std::collections::{BTreeMap, HashMap};

/// Docker API 필터 인자 (`key -> [values]`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    args: BTreeMap<String, Vec<String>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 키에 값을 누적한다
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.args.entry(key.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// 다른 필터의 값을 합친다
    pub fn merge(&mut self, other: &Filters) {
        for (key, values) in &other.args {
            for value in values {
                self.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.args.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// bollard 옵션 구조체가 받는 형태
    pub fn to_args(&self) -> HashMap<String, Vec<String>> {
        self.args.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

impl From<HashMap<String, String>> for Filters {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Filters> for HashMap<String, Vec<String>> {
    fn from(filters: Filters) -> Self {
        filters.args.into_iter().collect()
    }
}

//! 内存列表的筛选、排序和分页
//!
//! 所有函数返回新的集合，不修改输入。

use chrono::NaiveDate;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "截止日期升序",
            SortOrder::Desc => "截止日期降序",
        }
    }
}

/// 谓词集合，所有谓词同时满足才算匹配
pub struct Filter<T> {
    predicates: Vec<Box<dyn Fn(&T) -> bool>>,
}

impl<T: 'static> Default for Filter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Filter<T> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// 字段等于给定值；`None` 表示“全部”
    pub fn eq<V, K>(mut self, key: K, value: Option<V>) -> Self
    where
        V: PartialEq + 'static,
        K: Fn(&T) -> V + 'static,
    {
        if let Some(value) = value {
            self.predicates.push(Box::new(move |item| key(item) == value));
        }
        self
    }

    /// 任一字段包含关键字（不区分大小写）；空关键字匹配全部
    pub fn contains(mut self, query: &str, fields: Vec<fn(&T) -> &str>) -> Self {
        let query = query.trim().to_lowercase();
        if !query.is_empty() {
            self.predicates.push(Box::new(move |item| {
                fields
                    .iter()
                    .any(|field| field(item).to_lowercase().contains(&query))
            }));
        }
        self
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    /// 保持原有相对顺序
    pub fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

/// 按日期字段稳定排序
pub fn sort_by_date<T, K>(items: &[T], key: K, order: SortOrder) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> NaiveDate,
{
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| key(a).cmp(&key(b))),
        SortOrder::Desc => sorted.sort_by(|a, b| key(b).cmp(&key(a))),
    }
    sorted
}

/// 一页数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 从 1 开始
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// 取第 `page` 页（从 1 开始），超出范围的页为空
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();

    let start = page.saturating_sub(1).saturating_mul(page_size);
    let slice = if page == 0 || start >= total {
        &[][..]
    } else {
        let end = (start + page_size).min(total);
        &items[start..end]
    };

    Page {
        items: slice.to_vec(),
        page,
        page_size,
        total,
        total_pages: total_pages(total, page_size),
    }
}

//! 页面路由
//!
//! 路径与原有导航保持一致，例如 `/tasks/T-001/submit`。
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Tasks,
    TaskDetail(String),
    TaskSubmit(String),
    TaskConfirm(String),
    TaskPayment(String),
    Evaluations,
    Supplier,
    Users,
    Finance,
    Invoice(String),
}

/// 侧边栏导航项
pub const NAVIGATION: [(&str, &str); 6] = [
    ("首页", "/"),
    ("任务管理", "/tasks"),
    ("测评管理", "/evaluations"),
    ("供应商信息", "/supplier"),
    ("用户管理", "/users"),
    ("财务管理", "/finance"),
];

impl Route {
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::Dashboard,
            ["tasks"] => Route::Tasks,
            ["tasks", id] => Route::TaskDetail(id.to_string()),
            ["tasks", id, "submit"] => Route::TaskSubmit(id.to_string()),
            ["tasks", id, "confirm"] => Route::TaskConfirm(id.to_string()),
            ["tasks", id, "payment"] => Route::TaskPayment(id.to_string()),
            ["evaluations"] => Route::Evaluations,
            ["supplier"] => Route::Supplier,
            ["users"] => Route::Users,
            ["finance"] => Route::Finance,
            ["finance", "invoice", id] => Route::Invoice(id.to_string()),
            _ => return Err(ValidationError::UnknownRoute(trimmed.to_string())),
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Tasks => "/tasks".to_string(),
            Route::TaskDetail(id) => format!("/tasks/{}", id),
            Route::TaskSubmit(id) => format!("/tasks/{}/submit", id),
            Route::TaskConfirm(id) => format!("/tasks/{}/confirm", id),
            Route::TaskPayment(id) => format!("/tasks/{}/payment", id),
            Route::Evaluations => "/evaluations".to_string(),
            Route::Supplier => "/supplier".to_string(),
            Route::Users => "/users".to_string(),
            Route::Finance => "/finance".to_string(),
            Route::Invoice(id) => format!("/finance/invoice/{}", id),
        }
    }

    /// 页面所属栏目标题
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "首页",
            Route::Tasks
            | Route::TaskDetail(_)
            | Route::TaskSubmit(_)
            | Route::TaskConfirm(_)
            | Route::TaskPayment(_) => "任务管理",
            Route::Evaluations => "测评管理",
            Route::Supplier => "供应商信息",
            Route::Users => "用户管理",
            Route::Finance | Route::Invoice(_) => "财务管理",
        }
    }

    /// 面包屑：从首页到当前页面
    pub fn breadcrumb(&self) -> Vec<&'static str> {
        match self {
            Route::Dashboard => vec!["首页"],
            Route::TaskDetail(_) => vec!["首页", "任务管理", "任务详情"],
            Route::TaskSubmit(_) => vec!["首页", "任务管理", "任务详情", "提交成果"],
            Route::TaskConfirm(_) => vec!["首页", "任务管理", "任务详情", "验收确认"],
            Route::TaskPayment(_) => vec!["首页", "任务管理", "任务详情", "申请付款"],
            Route::Invoice(_) => vec!["首页", "财务管理", "发票上传"],
            other => vec!["首页", other.title()],
        }
    }

    /// 侧边栏中的序号
    pub fn nav_index(&self) -> usize {
        NAVIGATION
            .iter()
            .position(|(name, _)| *name == self.title())
            .unwrap_or(0)
    }

    /// 上一级页面
    pub fn parent(&self) -> Route {
        match self {
            Route::Dashboard => Route::Dashboard,
            Route::TaskDetail(_) => Route::Tasks,
            Route::TaskSubmit(id) | Route::TaskConfirm(id) | Route::TaskPayment(id) => {
                Route::TaskDetail(id.clone())
            }
            Route::Invoice(_) => Route::Finance,
            _ => Route::Dashboard,
        }
    }
}

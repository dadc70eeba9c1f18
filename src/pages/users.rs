//! 用户管理：筛选、分页、添加/编辑、启用/禁用
use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::user::next_user_id;
use crate::models::{PendingConfirmation, Role, User, UserForm, UserStatus};
use crate::query::{Filter, Page, paginate};

fn user_id(user: &User) -> &str {
    &user.id
}

fn user_name(user: &User) -> &str {
    &user.name
}

pub struct UserAdmin {
    users: Vec<User>,
    pub role_filter: Option<Role>,
    pub status_filter: Option<UserStatus>,
    search: String,
    /// 从 1 开始
    page: usize,
    page_size: usize,
    /// 当前页内选中的行
    pub selected: usize,
    form: Option<UserForm>,
    pub form_error: Option<String>,
    pending_toggle: Option<PendingConfirmation<String>>,
}

impl UserAdmin {
    pub fn new(users: Vec<User>, page_size: usize) -> Self {
        Self {
            users,
            role_filter: None,
            status_filter: None,
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            selected: 0,
            form: None,
            form_error: None,
            pending_toggle: None,
        }
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// 按角色、状态、关键字（ID或姓名）筛选
    pub fn filtered(&self) -> Vec<User> {
        Filter::new()
            .eq(|u: &User| u.role, self.role_filter)
            .eq(|u: &User| u.status, self.status_filter)
            .contains(&self.search, vec![user_id as fn(&User) -> &str, user_name])
            .apply(&self.users)
    }

    pub fn current_page(&self) -> Page<User> {
        paginate(&self.filtered(), self.page_size, self.page)
    }

    fn reset_page(&mut self) {
        self.page = 1;
        self.selected = 0;
    }

    /// 数据变化后筛选结果可能变少，页码和选中行收回到有效范围
    fn clamp_page(&mut self) {
        let total_pages = self.current_page().total_pages.max(1);
        self.page = self.page.min(total_pages);
        let len = self.current_page().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.reset_page();
    }

    pub fn cycle_role_filter(&mut self) {
        self.role_filter = match self.role_filter {
            None => Some(Role::Admin),
            Some(Role::Admin) => Some(Role::Standard),
            Some(Role::Standard) => None,
        };
        self.reset_page();
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(UserStatus::Enabled),
            Some(UserStatus::Enabled) => Some(UserStatus::Disabled),
            Some(UserStatus::Disabled) => None,
        };
        self.reset_page();
    }

    pub fn next_page(&mut self) {
        if self.page < self.current_page().total_pages {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        self.selected = super::step(self.selected, self.current_page().items.len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = super::step(self.selected, self.current_page().items.len(), false);
    }

    pub fn selected_user(&self) -> Option<User> {
        self.current_page().items.into_iter().nth(self.selected)
    }

    pub fn form(&self) -> Option<&UserForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut UserForm> {
        self.form.as_mut()
    }

    pub fn open_add(&mut self) {
        self.form = Some(UserForm::default());
        self.form_error = None;
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), ValidationError> {
        let user = self.get(id).ok_or_else(|| ValidationError::NotFound {
            entity: "用户",
            id: id.to_string(),
        })?;
        self.form = Some(UserForm::from_user(user));
        self.form_error = None;
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.form_error = None;
    }

    /// 保存表单，返回用户ID；校验失败时表单保持打开
    ///
    /// 新用户的ID顺序生成，加入时间为今天，默认启用。
    pub fn save_form(&mut self, today: NaiveDate) -> Result<String, ValidationError> {
        let Some(form) = self.form.as_ref() else {
            return Err(ValidationError::MissingField("用户信息"));
        };
        if let Err(err) = form.validate() {
            self.form_error = Some(err.to_string());
            return Err(err);
        }

        let name = form.name.trim().to_string();
        let phone = form.phone.trim().to_string();
        let notes = form.notes.trim().to_string();

        let id = match &form.id {
            Some(id) => {
                let id = id.clone();
                let user = self
                    .users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| ValidationError::NotFound {
                        entity: "用户",
                        id: id.clone(),
                    })?;
                user.name = name;
                user.role = form.role;
                user.phone = phone;
                user.notes = notes;
                tracing::info!(user = %id, "user updated");
                id
            }
            None => {
                let id = next_user_id(&self.users);
                self.users.push(User {
                    id: id.clone(),
                    name,
                    role: form.role,
                    phone,
                    join_time: today,
                    status: UserStatus::Enabled,
                    notes,
                });
                tracing::info!(user = %id, "user added");
                id
            }
        };

        self.form = None;
        self.form_error = None;
        self.clamp_page();
        Ok(id)
    }

    /// 第一步：请求切换状态，返回确认提示
    pub fn request_toggle(&mut self, id: &str) -> Result<String, ValidationError> {
        let user = self.get(id).ok_or_else(|| ValidationError::NotFound {
            entity: "用户",
            id: id.to_string(),
        })?;
        let prompt = toggle_prompt(user.status);
        self.pending_toggle = Some(PendingConfirmation::request(id.to_string()));
        Ok(prompt)
    }

    /// 第二步：确认后才切换，返回新状态
    pub fn confirm_toggle(&mut self) -> Option<UserStatus> {
        let id = self.pending_toggle.take()?.confirm().into_subject();
        let user = self.users.iter_mut().find(|u| u.id == id)?;
        user.status = user.status.toggled();
        let status = user.status;
        tracing::info!(user = %id, status = %status, "user status toggled");
        self.clamp_page();
        Some(status)
    }

    pub fn cancel_toggle(&mut self) {
        self.pending_toggle = None;
    }
}

/// 切换前的确认提示
pub fn toggle_prompt(current: UserStatus) -> String {
    format!("确定要{}该用户吗？", current.toggled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn admin() -> UserAdmin {
        UserAdmin::new(seed::users(), 5)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_pagination() {
        let mut users = admin();
        let page = users.current_page();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 10);
        assert_eq!(page.total_pages, 2);

        users.next_page();
        assert_eq!(users.current_page().items[0].id, "U-006");
        users.next_page();
        assert_eq!(users.current_page().page, 2);
        users.prev_page();
        users.prev_page();
        assert_eq!(users.current_page().page, 1);
    }

    #[test]
    fn test_filters_reset_page() {
        let mut users = admin();
        users.next_page();
        users.cycle_status_filter();
        users.cycle_status_filter();
        let page = users.current_page();
        assert_eq!(page.page, 1);
        let ids: Vec<String> = page.items.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["U-002", "U-006", "U-010"]);

        users.cycle_role_filter();
        assert_eq!(users.filtered().len(), 0);
    }

    #[test]
    fn test_search_by_id_or_name() {
        let mut users = admin();
        users.set_search("王");
        let ids: Vec<String> = users.filtered().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["U-003", "U-010"]);

        users.set_search("u-01");
        assert_eq!(users.filtered().len(), 1);
    }

    #[test]
    fn test_add_user() {
        let mut users = admin();
        users.open_add();
        if let Some(form) = users.form_mut() {
            form.name = "陈十三".to_string();
        }
        assert_eq!(
            users.save_form(today()),
            Err(ValidationError::MissingField("联系电话"))
        );
        assert!(users.form().is_some());
        assert_eq!(users.form_error.as_deref(), Some("联系电话为必填项"));

        if let Some(form) = users.form_mut() {
            form.phone = "13800138010".to_string();
        }
        let id = users.save_form(today()).unwrap();
        assert_eq!(id, "U-011");
        assert!(users.form().is_none());

        let user = users.get("U-011").unwrap();
        assert_eq!(user.join_time, today());
        assert_eq!(user.status, UserStatus::Enabled);
        assert_eq!(user.role, Role::Standard);
    }

    #[test]
    fn test_edit_user() {
        let mut users = admin();
        users.open_edit("U-002").unwrap();
        if let Some(form) = users.form_mut() {
            form.notes = "负责质检复核".to_string();
            form.role = Role::Admin;
        }
        assert_eq!(users.save_form(today()), Ok("U-002".to_string()));
        let user = users.get("U-002").unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.notes, "负责质检复核");
        assert_eq!(users.all().len(), 10);
    }

    #[test]
    fn test_toggle_requires_confirmation() {
        let mut users = admin();
        assert_eq!(users.request_toggle("U-001").unwrap(), "确定要禁用该用户吗？");
        assert_eq!(users.get("U-001").unwrap().status, UserStatus::Enabled);

        users.cancel_toggle();
        assert!(users.confirm_toggle().is_none());
        assert_eq!(users.get("U-001").unwrap().status, UserStatus::Enabled);

        users.request_toggle("U-001").unwrap();
        assert_eq!(users.confirm_toggle(), Some(UserStatus::Disabled));
        assert_eq!(users.get("U-001").unwrap().status, UserStatus::Disabled);
        assert_eq!(users.request_toggle("U-001").unwrap(), "确定要启用该用户吗？");
    }

    #[test]
    fn test_toggle_last_row_moves_back_a_page() {
        let mut users = UserAdmin::new(seed::users(), 2);
        users.cycle_status_filter();
        users.cycle_status_filter();
        assert_eq!(users.status_filter, Some(UserStatus::Disabled));
        users.next_page();
        let page = users.current_page();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].id, "U-010");

        users.request_toggle("U-010").unwrap();
        assert_eq!(users.confirm_toggle(), Some(UserStatus::Enabled));
        let page = users.current_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 2);
        assert!(users.selected_user().is_some());
    }

    #[test]
    fn test_role_edit_under_filter_clamps_page() {
        let mut users = UserAdmin::new(seed::users(), 7);
        users.cycle_role_filter();
        users.cycle_role_filter();
        assert_eq!(users.role_filter, Some(Role::Standard));
        users.next_page();
        let page = users.current_page();
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);

        users.open_edit("U-010").unwrap();
        if let Some(form) = users.form_mut() {
            form.role = Role::Admin;
        }
        users.save_form(today()).unwrap();
        let page = users.current_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(users.selected_user().unwrap().id, "U-002");
    }
}

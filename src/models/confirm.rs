/// 两步确认：先发起请求，再确认或取消
///
/// 只有 `PendingConfirmation::confirm` 能产生 `Confirmed`，
/// 需要确认的操作以 `Confirmed<T>` 作为参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation<T> {
    subject: T,
}

/// 已确认的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed<T> {
    subject: T,
}

impl<T> PendingConfirmation<T> {
    pub fn request(subject: T) -> Self {
        Self { subject }
    }

    #[cfg(test)]
    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn confirm(self) -> Confirmed<T> {
        Confirmed {
            subject: self.subject,
        }
    }

    /// 取消请求，不产生任何效果
    pub fn cancel(self) -> T {
        self.subject
    }
}

impl<T> Confirmed<T> {
    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn into_subject(self) -> T {
        self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_keeps_subject() {
        let pending = PendingConfirmation::request("T-004".to_string());
        assert_eq!(pending.subject(), "T-004");
        let confirmed = pending.confirm();
        assert_eq!(confirmed.into_subject(), "T-004");
    }

    #[test]
    fn test_cancel_returns_subject() {
        let pending = PendingConfirmation::request(7u32);
        assert_eq!(pending.cancel(), 7);
    }
}

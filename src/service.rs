//! 提交服务
//!
//! 界面线程把操作交给 tokio 运行时执行，结果通过 channel 在下一帧取回。
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::OperationFailure;

/// 需要提交的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    AcceptTask { task_id: String },
    RejectTask { task_id: String, reason: String },
    SubmitDeliverables { task_id: String, files: Vec<String> },
    ConfirmAcceptance { task_id: String },
    ApplyForPayment { task_id: String, invoice: String },
    UploadInvoice { record_id: String, invoice: String },
    SaveSupplierProfile { company_name: String },
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::AcceptTask { .. } => "接受任务",
            Operation::RejectTask { .. } => "拒绝任务",
            Operation::SubmitDeliverables { .. } => "提交成果",
            Operation::ConfirmAcceptance { .. } => "确认验收",
            Operation::ApplyForPayment { .. } => "申请付款",
            Operation::UploadInvoice { .. } => "上传发票",
            Operation::SaveSupplierProfile { .. } => "保存供应商信息",
        }
    }

    /// 提交成功后的提示
    pub fn success_message(&self) -> &'static str {
        match self {
            Operation::AcceptTask { .. } => "任务已接受！",
            Operation::RejectTask { .. } => "任务已拒绝！",
            Operation::SubmitDeliverables { .. } => "成果提交成功！",
            Operation::ConfirmAcceptance { .. } => "验收确认成功！",
            Operation::ApplyForPayment { .. } => "付款申请已提交！",
            Operation::UploadInvoice { .. } => "发票上传成功！",
            Operation::SaveSupplierProfile { .. } => "供应商信息保存成功！",
        }
    }

    /// 同类操作且作用于同一对象
    pub fn same_target(&self, other: &Operation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.target() == other.target()
    }

    /// 操作对象的标识
    pub fn target(&self) -> &str {
        match self {
            Operation::AcceptTask { task_id }
            | Operation::RejectTask { task_id, .. }
            | Operation::SubmitDeliverables { task_id, .. }
            | Operation::ConfirmAcceptance { task_id }
            | Operation::ApplyForPayment { task_id, .. } => task_id,
            Operation::UploadInvoice { record_id, .. } => record_id,
            Operation::SaveSupplierProfile { company_name } => company_name,
        }
    }
}

pub trait OperationService: Send + Sync + 'static {
    fn submit(&self, operation: Operation) -> impl Future<Output = Result<(), OperationFailure>> + Send;
}

/// 固定延迟后返回的模拟服务
#[derive(Debug, Clone)]
pub struct SimulatedService {
    delay: Duration,
    fail: bool,
}

impl SimulatedService {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    /// 总是失败的版本
    #[cfg(test)]
    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }
}

impl OperationService for SimulatedService {
    async fn submit(&self, operation: Operation) -> Result<(), OperationFailure> {
        tracing::debug!(op = operation.label(), target = operation.target(), "submitting");
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(OperationFailure {
                operation: operation.label(),
                reason: "服务暂时不可用".to_string(),
            });
        }
        Ok(())
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ticket: u64,
    pub result: Result<(), OperationFailure>,
}

/// 把操作派发到运行时，并收集结果
pub struct Dispatcher<S> {
    service: Arc<S>,
    handle: Handle,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
    next_ticket: u64,
}

impl<S: OperationService> Dispatcher<S> {
    pub fn new(service: S, handle: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service: Arc::new(service),
            handle,
            tx,
            rx,
            next_ticket: 1,
        }
    }

    /// 派发操作，返回用于匹配结果的票据
    pub fn dispatch(&mut self, operation: Operation) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = service.submit(operation).await;
            // 接收端只会在退出时关闭
            let _ = tx.send(Outcome { ticket, result });
        });
        ticket
    }

    /// 取出所有已完成的结果，不阻塞
    pub fn drain(&self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }

    /// 阻塞等待下一个结果
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Outcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}

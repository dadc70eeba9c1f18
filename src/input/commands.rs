use crate::route::Route;

/// 应用命令枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ===== 全局 =====
    Quit,
    ShowHelp,
    /// 进入命令模式
    EnterCommandMode,
    /// 跳转到页面
    Navigate(Route),
    /// 返回上一级页面
    Back,
    /// 选择下一项
    SelectNext,
    /// 选择上一项
    SelectPrev,
    /// 打开选中项
    Open,

    // ===== 任务 =====
    /// 切换状态筛选
    CycleStatusFilter,
    /// 切换截止日期排序
    ToggleSort,
    /// 执行选中任务的下一步操作
    NextAction,
    /// 跳转到第一条提醒的操作页面
    FollowReminder,
    AcceptTask,
    RejectTask,
    GoSubmit,
    GoConfirm,
    GoPayment,

    // ===== 上传与提交 =====
    /// 选择文件
    AttachFiles,
    /// 移除选中文件
    RemoveFile,
    /// 提交当前页面
    Submit,

    // ===== 测评 =====
    Distribute,
    ApplyForMore,

    // ===== 供应商信息 =====
    /// 编辑选中的字段或项目
    EditItem,
    AddProject,
    /// 移除选中的项目或材料
    RemoveItem,
    SaveProfile,

    // ===== 用户 =====
    Search,
    CycleRoleFilter,
    NextPage,
    PrevPage,
    AddUser,
    EditUser,
    ToggleUser,

    // ===== 财务 =====
    UploadInvoice,
}

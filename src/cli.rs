use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::env;
use std::path::Path;

use crate::clock::{parse_date, Clock, FixedClock, SystemClock};
use crate::config;
use crate::models::finance::format_currency;
use crate::models::reminder::reminders;
use crate::models::{
    Attachment, AttachmentSet, EvaluationStatus, Role, Task, TaskStatus, UploadContext, UserStatus,
};
use crate::pages::{FinanceBoard, TaskList, UserAdmin};
use crate::query::SortOrder;
use crate::seed;

/// 处理 CLI 命令
/// 返回 true 表示应该继续进入 TUI，false 表示已处理完毕应该退出
pub fn handle_cli() -> Result<bool> {
    let args: Vec<String> = env::args().collect();

    // 如果没有参数，进入 TUI 模式
    if args.len() < 2 {
        return Ok(true);
    }

    let result = match args[1].as_str() {
        "task" => handle_task_command(&args[1..]),
        "user" => handle_user_command(&args[1..]),
        "evaluation" | "eval" => handle_evaluation_command(&args[1..]),
        "finance" => finance_show(has_flag(&args[2..], "--json")),
        "check" => check_files(&args[2..]),
        "config" => handle_config_command(&args[2..]),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "-v" => {
            print_version();
            Ok(())
        }
        cmd => Err(anyhow::anyhow!(
            "未知命令: {}\n使用 'sadm help' 查看帮助",
            cmd
        )),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(false)
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|s| s == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|s| s == flag)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len.saturating_sub(3)).collect::<String>())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Task Commands
// ============================================================================

fn handle_task_command(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        print_task_usage();
        return Ok(());
    }

    let flags = &args[2..];
    let json = has_flag(flags, "--json");
    match args[1].as_str() {
        "list" => {
            let tasks = task_rows(
                parse_flag(flags, "--status").as_deref(),
                parse_flag(flags, "--sort").as_deref(),
            )?;
            if json {
                print_json(&tasks)
            } else {
                task_list(&tasks);
                Ok(())
            }
        }
        "show" => {
            let Some(id) = flags.first() else {
                bail!("缺少任务ID\n用法: sadm task show <id>");
            };
            task_show(id, json)
        }
        "reminders" => {
            let today = match parse_flag(flags, "--today") {
                Some(s) => FixedClock(parse_today(&s)?).today(),
                None => SystemClock.today(),
            };
            let window = config::load_config()
                .map(|c| c.reminder_window_days)
                .unwrap_or(crate::models::reminder::DEFAULT_REMINDER_WINDOW_DAYS);
            task_reminders(today, window, json)
        }
        "help" | "--help" | "-h" => {
            print_task_usage();
            Ok(())
        }
        cmd => bail!("未知的任务命令: {}\n使用 'sadm task help' 查看用法", cmd),
    }
}

fn print_task_usage() {
    println!("任务命令

用法:
    sadm task <子命令>

子命令:
    list [--status <状态>] [--sort asc|desc]   列出任务
    show <id>                                 查看任务详情
    reminders [--today YYYY-MM-DD]            查看任务提醒

状态:
    pending_acceptance  in_progress  pending_verification
    verified  completed  rejected（也可使用中文名称）

所有子命令都支持 --json 输出。

示例:
    sadm task list --status in_progress
    sadm task show T-001
    sadm task reminders --today 2023-12-13");
}

fn parse_today(s: &str) -> Result<NaiveDate> {
    parse_date(s).with_context(|| format!("无效的日期: {}（格式 YYYY-MM-DD）", s))
}

/// 按状态筛选并按截止日期排序
fn task_rows(status: Option<&str>, sort: Option<&str>) -> Result<Vec<Task>> {
    let mut list = TaskList::new(seed::tasks());
    if let Some(s) = status {
        let status = TaskStatus::parse(s).with_context(|| format!("未知的任务状态: {}", s))?;
        list.set_status_filter(Some(status));
    }
    if let Some(s) = sort {
        list.sort = SortOrder::parse(s).with_context(|| format!("未知的排序方式: {}", s))?;
    }
    Ok(list.visible())
}

fn task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("没有任务。");
        return;
    }

    println!("ID     名称                  截止日期    金额        状态");
    println!("-----  --------------------  ----------  ----------  ----------");

    for task in tasks {
        println!(
            "{:<5}  {:<20}  {}  {:<10}  {}",
            task.id(),
            truncate(task.name(), 20),
            task.deadline(),
            format_currency(task.amount()),
            task.status()
        );
    }
}

fn task_show(id: &str, json: bool) -> Result<()> {
    let list = TaskList::new(seed::tasks());
    let task = list.find(id)?;

    if json {
        return print_json(task);
    }

    println!("任务 {}", task.id());
    println!("名称: {}", task.name());
    println!("状态: {}", task.status());
    println!("截止日期: {}", task.deadline());
    println!("金额: {}", format_currency(task.amount()));
    if let Some(reason) = task.rejection_reason() {
        println!("拒绝原因: {}", reason);
    }
    let actions: Vec<&str> = task.available_actions().iter().map(|a| a.label()).collect();
    println!(
        "可执行操作: {}",
        if actions.is_empty() { "-".to_string() } else { actions.join(", ") }
    );
    println!("\n任务描述:");
    println!("{}", task.description());
    println!("\n交付要求:");
    println!("{}", task.requirements());

    Ok(())
}

fn task_reminders(today: NaiveDate, window_days: i64, json: bool) -> Result<()> {
    let found = reminders(&seed::tasks(), today, window_days);
    if json {
        return print_json(&found);
    }

    if found.is_empty() {
        println!("{} 没有需要处理的任务。", today);
        return Ok(());
    }

    for reminder in &found {
        println!("⚠ {} {}", reminder.task_id, reminder.task_name);
        println!("  {}", reminder.message);
        println!("  {}", reminder.alert);
        println!("  → {}: {}", reminder.action_label, reminder.action_path);
    }
    Ok(())
}

// ============================================================================
// User Commands
// ============================================================================

fn handle_user_command(args: &[String]) -> Result<()> {
    match args.get(1).map(String::as_str) {
        Some("list") => {
            let flags = &args[2..];
            let page = match parse_flag(flags, "--page") {
                Some(p) => p
                    .parse::<usize>()
                    .with_context(|| format!("无效的页码: {}", p))?,
                None => 1,
            };
            let admin = user_admin(
                parse_flag(flags, "--role").as_deref(),
                parse_flag(flags, "--status").as_deref(),
                parse_flag(flags, "--search").as_deref(),
                page,
            )?;
            user_list(&admin, has_flag(flags, "--json"))
        }
        Some(cmd) if cmd != "help" && cmd != "--help" && cmd != "-h" => {
            bail!("未知的用户命令: {}\n使用 'sadm user help' 查看用法", cmd)
        }
        _ => {
            println!("用户命令

用法:
    sadm user list [--role admin|standard] [--status enabled|disabled]
                   [--search <关键字>] [--page <n>] [--json]");
            Ok(())
        }
    }
}

fn user_admin(
    role: Option<&str>,
    status: Option<&str>,
    search: Option<&str>,
    page: usize,
) -> Result<UserAdmin> {
    let page_size = config::load_config()
        .map(|c| c.users_per_page)
        .unwrap_or(5);
    let mut admin = UserAdmin::new(seed::users(), page_size);
    if let Some(r) = role {
        admin.role_filter = Some(Role::parse(r).with_context(|| format!("未知的角色: {}", r))?);
    }
    if let Some(s) = status {
        admin.status_filter =
            Some(UserStatus::parse(s).with_context(|| format!("未知的用户状态: {}", s))?);
    }
    if let Some(q) = search {
        admin.set_search(q);
    }
    for _ in 1..page {
        admin.next_page();
    }
    Ok(admin)
}

fn user_list(admin: &UserAdmin, json: bool) -> Result<()> {
    let page = admin.current_page();
    if json {
        return print_json(&page.items);
    }

    println!("ID     姓名      角色      电话         加入时间    状态  备注");
    println!("-----  --------  --------  -----------  ----------  ----  ----------");
    for user in &page.items {
        println!(
            "{:<5}  {:<8}  {:<8}  {:<11}  {}  {:<4}  {}",
            user.id,
            user.name,
            user.role.display(),
            user.phone,
            user.join_time,
            user.status.display(),
            truncate(&user.notes, 20)
        );
    }
    println!("\n第 {}/{} 页  共 {} 条", page.page, page.total_pages.max(1), page.total);
    Ok(())
}

// ============================================================================
// Evaluation / Finance
// ============================================================================

fn handle_evaluation_command(args: &[String]) -> Result<()> {
    match args.get(1).map(String::as_str) {
        Some("list") | None => {
            let flags = args.get(2..).unwrap_or_default();
            let status = match parse_flag(flags, "--status") {
                Some(s) => Some(
                    EvaluationStatus::parse(&s)
                        .with_context(|| format!("未知的测评状态: {}", s))?,
                ),
                None => None,
            };
            let evaluations: Vec<_> = seed::evaluations()
                .into_iter()
                .filter(|e| status.map_or(true, |s| e.status == s))
                .collect();

            if has_flag(flags, "--json") {
                return print_json(&evaluations);
            }

            println!("测评类型:");
            for ty in seed::evaluation_types() {
                println!("  {} {}", if ty.passed { "✓" } else { "○" }, ty.name);
            }
            println!();
            println!("ID     名称                  截止日期    状态");
            println!("-----  --------------------  ----------  ------");
            for e in &evaluations {
                println!(
                    "{:<5}  {:<20}  {}  {}",
                    e.id,
                    truncate(&e.name, 20),
                    e.deadline,
                    e.status
                );
            }
            Ok(())
        }
        Some(cmd) => bail!("未知的测评命令: {}\n用法: sadm evaluation list [--status pending|completed]", cmd),
    }
}

fn finance_show(json: bool) -> Result<()> {
    let board = FinanceBoard::new(seed::finance_overview(), seed::finance_records());
    if json {
        #[derive(Serialize)]
        struct FinanceView<'a> {
            overview: &'a crate::models::FinanceOverview,
            records: &'a [crate::models::TaskRecord],
        }
        return print_json(&FinanceView {
            overview: board.overview(),
            records: board.records(),
        });
    }

    let overview = board.overview();
    println!("账户余额: {}", format_currency(overview.account_balance));
    println!("待结算:   {}", format_currency(overview.pending_settlement));
    println!("已结算:   {}", format_currency(overview.settled_amount));
    println!();
    println!("ID     名称                  金额        结算状态  发票");
    println!("-----  --------------------  ----------  --------  ------");
    for record in board.records() {
        println!(
            "{:<5}  {:<20}  {:<10}  {:<8}  {}",
            record.task_id,
            truncate(&record.name, 20),
            format_currency(record.amount),
            record.settlement.display(),
            if board.can_upload_invoice(&record.task_id) { "可上传" } else { "-" }
        );
    }
    Ok(())
}

// ============================================================================
// Attachment Check
// ============================================================================

/// 按上传场景校验磁盘上的文件，全部通过才返回 Ok
fn check_files(args: &[String]) -> Result<()> {
    let Some(context) = args.first() else {
        bail!("用法: sadm check <invoice|deliverable|video|document> <文件>...");
    };
    let context = UploadContext::parse(context)
        .with_context(|| format!("未知的上传场景: {}", context))?;
    let paths = &args[1..];
    if paths.is_empty() {
        bail!("缺少文件\n用法: sadm check {} <文件>...", args[0]);
    }

    println!("{}：{}", context.label(), context.hint());
    let batch = paths
        .iter()
        .map(|p| {
            Attachment::from_path(Path::new(p)).with_context(|| format!("无法读取文件: {}", p))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut set = AttachmentSet::new(context);
    match set.add_batch(batch) {
        Ok(_) => {
            for file in set.files() {
                println!("✓ {}  {}  {}", file.name, file.display_size(), file.mime_type);
            }
            Ok(())
        }
        Err(err) => bail!("✗ {}", err),
    }
}

// ============================================================================
// Config Commands
// ============================================================================

fn handle_config_command(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None | Some("show") => config::show_config(),
        Some("path") => {
            println!("{}", config::get_config_path()?.display());
            Ok(())
        }
        Some("delay") => {
            let Some(value) = args.get(1) else {
                bail!("用法: sadm config delay <毫秒>");
            };
            let ms = value
                .parse::<u64>()
                .with_context(|| format!("无效的毫秒数: {}", value))?;
            config::set_delay(ms)
        }
        Some("window") => {
            let Some(value) = args.get(1) else {
                bail!("用法: sadm config window <天数>");
            };
            let days = value
                .parse::<i64>()
                .with_context(|| format!("无效的天数: {}", value))?;
            config::set_window(days)
        }
        Some(other) => {
            bail!("未知的配置选项: {}\n可用选项: show, path, delay, window", other)
        }
    }
}

/// 打印帮助信息
fn print_help() {
    println!("Supplier Admin (sadm) - 终端供应商管理控制台\n");
    println!("用法:");
    println!("  sadm                    启动 TUI 界面");
    println!("  sadm <命令> [参数]        运行 CLI 命令");
    println!("  sadm help               显示此帮助信息");
    println!("  sadm --version          显示版本信息\n");

    println!("CLI 命令:");
    println!("  task list|show|reminders   任务查询");
    println!("  user list                  用户查询");
    println!("  evaluation list            测评查询");
    println!("  finance                    财务概览与结算记录");
    println!("  check <场景> <文件>...      按上传规则校验文件");
    println!("  config [show|path|delay|window]  查看或修改配置\n");

    println!("示例:");
    println!("  sadm task list --status in_progress --sort desc");
    println!("  sadm task reminders --today 2023-12-13");
    println!("  sadm user list --role admin --json");
    println!("  sadm check invoice ./发票.pdf");
    println!("  sadm config delay 500\n");

    println!("日志:");
    println!("  写入数据目录下的 sadm.log，可通过 RUST_LOG 调整级别");
}

/// 打印版本信息
fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    println!("{} {}", NAME, VERSION);
}

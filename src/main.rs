use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

mod app;
mod cli;
mod clock;
mod config;
mod error;
mod input;
mod logging;
mod models;
mod pages;
mod query;
mod route;
mod seed;
mod service;
mod ui;

use app::App;

fn main() -> Result<()> {
    // 处理 CLI 命令
    let should_run_tui = cli::handle_cli()?;

    // 如果 CLI 命令已处理，直接退出
    if !should_run_tui {
        return Ok(());
    }

    let config = config::load_or_init()?;
    let _log_guard = logging::init_tracing(&config::get_data_dir()?, &config.log_level)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "启动");

    // 提交服务运行在后台线程上，界面循环保持同步
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .context("创建异步运行时失败")?;

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 创建应用
    let mut app = App::new(config, runtime.handle().clone());

    // 运行应用
    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "界面异常退出");
        eprintln!("Error: {:?}", err);
    }

    tracing::info!("退出");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // 取回已完成的提交
        app.poll_operations();
        app.clear_expired_notification();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if !app.handle_key(key) {
                    return Ok(()); // 退出应用
                }
            }
        }
    }
}

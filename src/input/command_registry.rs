/// 命令注册表 - `:` 命令行可用的命令
use std::collections::HashMap;

use super::Command;
use crate::route::Route;

/// 命令定义
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// 完整命令名
    pub name: &'static str,
    /// 命令别名列表
    pub aliases: Vec<&'static str>,
    /// 命令描述
    pub description: &'static str,
    /// 执行的命令
    pub command: Command,
}

/// 命令注册表
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
    // 命令名/别名 -> 命令索引的映射
    lookup: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            commands: Vec::new(),
            lookup: HashMap::new(),
        };
        registry.register_default_commands();
        registry
    }

    /// 注册默认命令
    fn register_default_commands(&mut self) {
        self.register(CommandDef {
            name: "quit",
            aliases: vec!["q"],
            description: "退出应用",
            command: Command::Quit,
        });

        self.register(CommandDef {
            name: "help",
            aliases: vec!["h", "?"],
            description: "显示帮助信息",
            command: Command::ShowHelp,
        });

        self.register(CommandDef {
            name: "back",
            aliases: vec!["b"],
            description: "返回上一级页面",
            command: Command::Back,
        });

        // 页面跳转
        self.register(CommandDef {
            name: "home",
            aliases: vec!["dashboard"],
            description: "首页",
            command: Command::Navigate(Route::Dashboard),
        });

        self.register(CommandDef {
            name: "tasks",
            aliases: vec!["t"],
            description: "任务管理",
            command: Command::Navigate(Route::Tasks),
        });

        self.register(CommandDef {
            name: "evaluations",
            aliases: vec!["eval", "e"],
            description: "测评管理",
            command: Command::Navigate(Route::Evaluations),
        });

        self.register(CommandDef {
            name: "supplier",
            aliases: vec!["sup", "s"],
            description: "供应商信息",
            command: Command::Navigate(Route::Supplier),
        });

        self.register(CommandDef {
            name: "users",
            aliases: vec!["u"],
            description: "用户管理",
            command: Command::Navigate(Route::Users),
        });

        self.register(CommandDef {
            name: "finance",
            aliases: vec!["fin", "f"],
            description: "财务管理",
            command: Command::Navigate(Route::Finance),
        });

        // 页面操作
        self.register(CommandDef {
            name: "write",
            aliases: vec!["w", "save"],
            description: "保存供应商信息",
            command: Command::SaveProfile,
        });
    }

    /// 注册一个命令
    fn register(&mut self, cmd: CommandDef) {
        let idx = self.commands.len();

        // 注册主命令名
        self.lookup.insert(cmd.name.to_string(), idx);

        // 注册所有别名
        for alias in &cmd.aliases {
            self.lookup.insert(alias.to_string(), idx);
        }

        self.commands.push(cmd);
    }

    /// 根据输入前缀查找匹配的命令
    pub fn find_matches(&self, input: &str) -> Vec<&CommandDef> {
        if input.is_empty() {
            return self.commands.iter().collect();
        }

        let input_lower = input.to_lowercase();
        let mut matches: Vec<&CommandDef> = self
            .commands
            .iter()
            .filter(|cmd| {
                cmd.name.starts_with(&input_lower)
                    || cmd.aliases.iter().any(|alias| alias.starts_with(&input_lower))
            })
            .collect();

        // 按命令名长度排序（优先显示短命令）
        matches.sort_by_key(|cmd| cmd.name.len());
        matches
    }

    /// 精确查找命令（用于执行）
    pub fn find_exact(&self, name: &str) -> Option<&CommandDef> {
        let idx = self.lookup.get(name)?;
        self.commands.get(*idx)
    }

    /// 解析命令行输入：以 `/` 开头的视为路由路径
    pub fn resolve(&self, input: &str) -> Option<Command> {
        let input = input.trim();
        if input.starts_with('/') {
            return Route::parse(input).ok().map(Command::Navigate);
        }
        self.find_exact(input).map(|def| def.command.clone())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches() {
        let registry = CommandRegistry::new();

        let matches = registry.find_matches("q");
        assert!(matches.iter().any(|cmd| cmd.name == "quit"));

        // 别名前缀
        let matches = registry.find_matches("fin");
        assert_eq!(matches[0].name, "finance");

        assert_eq!(registry.find_matches("").len(), 10);
    }

    #[test]
    fn test_find_exact() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.find_exact("q").map(|c| c.name), Some("quit"));
        assert_eq!(registry.find_exact("eval").map(|c| c.name), Some("evaluations"));
        assert!(registry.find_exact("nonexistent").is_none());
    }

    #[test]
    fn test_resolve_route_paths() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.resolve("/tasks/T-001/submit"),
            Some(Command::Navigate(Route::TaskSubmit("T-001".to_string())))
        );
        assert_eq!(registry.resolve(" users "), Some(Command::Navigate(Route::Users)));
        assert_eq!(registry.resolve("/settings"), None);
    }
}

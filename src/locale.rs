//! Output language and message tables.
//!
//! The language is picked once in `main` from the usual locale variables
//! and handed to the reporter as a `&'static Messages`.

/// Supported output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

/// Locale variables in precedence order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Substrings that select Chinese output.
const CHINESE_MARKERS: [&str; 6] = ["zh_CN", "zh_TW", "zh_HK", "zh_SG", "chinese", "Chinese"];

impl Language {
    /// Pick a language from the process environment.
    pub fn from_env() -> Self {
        Self::detect(|name| std::env::var(name).ok())
    }

    /// Pick a language using `lookup` to read locale variables.
    ///
    /// The first non-empty of `LC_ALL`, `LC_MESSAGES`, `LANG` decides.
    /// With none set the output is English.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let locale = LOCALE_VARS
            .into_iter()
            .find_map(|name| lookup(name).filter(|v| !v.is_empty()));

        match locale {
            Some(value) if CHINESE_MARKERS.into_iter().any(|m| value.contains(m)) => Self::Chinese,
            _ => Self::English,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Self::English => &ENGLISH,
            Self::Chinese => &CHINESE,
        }
    }
}

/// Every user-visible string, per language.
#[derive(Debug)]
pub struct Messages {
    pub title: &'static str,
    pub description: &'static str,
    pub cannot_open_display: &'static str,
    pub monitor_started: &'static str,
    pub current_owner: &'static str,
    pub monitoring: &'static str,
    pub change_detected: &'static str,
    pub cleared: &'static str,
    pub owner_info: &'static str,
    pub window_id: &'static str,
    pub window_name: &'static str,
    pub app_class: &'static str,
    pub app_name: &'static str,
    pub process_id: &'static str,
    pub command_line: &'static str,
    pub unknown: &'static str,
    pub cannot_retrieve: &'static str,
    pub truncated: &'static str,
    pub xres_unavailable: &'static str,
    pub pid_unresolved: &'static str,
}

pub static ENGLISH: Messages = Messages {
    title: "=== X11 Clipboard Monitor ===",
    description: "Function: Monitor clipboard changes and show owner process information",
    cannot_open_display: "Cannot open X display",
    monitor_started: "X11 clipboard monitor started",
    current_owner: "Current clipboard owner",
    monitoring: "Monitoring clipboard changes... (Press Ctrl+C to exit)",
    change_detected: "Clipboard change detected! Time",
    cleared: "Clipboard cleared",
    owner_info: "Clipboard Owner Information:",
    window_id: "Window ID",
    window_name: "Window Name",
    app_class: "Application Class",
    app_name: "Application Name",
    process_id: "Process ID",
    command_line: "Command Line",
    unknown: "Unknown",
    cannot_retrieve: "Cannot retrieve",
    truncated: "[truncated]",
    xres_unavailable: "XRes extension not available",
    pid_unresolved: "Cannot get process ID via XRes",
};

pub static CHINESE: Messages = Messages {
    title: "=== X11剪切板监控工具 ===",
    description: "功能: 监控剪切板变化并显示所有者进程信息",
    cannot_open_display: "无法打开X显示",
    monitor_started: "X11剪切板监控器已启动",
    current_owner: "当前剪切板所有者",
    monitoring: "开始监控剪切板变化... (按Ctrl+C退出)",
    change_detected: "检测到剪切板变化! 时间",
    cleared: "剪切板被清空",
    owner_info: "剪切板所有者信息:",
    window_id: "窗口ID",
    window_name: "窗口名称",
    app_class: "应用程序类",
    app_name: "应用程序名",
    process_id: "进程ID",
    command_line: "命令行",
    unknown: "未知",
    cannot_retrieve: "无法获取",
    truncated: "[已截断]",
    xres_unavailable: "XRes扩展不可用",
    pid_unresolved: "无法通过XRes获取进程ID",
};

//! Message formatting for push notifications
//!
//! Pure functions over their inputs; the caller supplies the timestamp so the
//! output is deterministic.

use chrono::{DateTime, Local};

use crate::core::RunSummary;

/// A formatted notification, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub content: String,
}

/// Local time in the `2024/1/5 08:03:01` style
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y/%-m/%-d %H:%M:%S").to_string()
}

/// Current local time, formatted for message bodies
pub fn now_timestamp() -> String {
    format_timestamp(Local::now())
}

fn status_word(success: bool) -> &'static str {
    if success {
        "成功"
    } else {
        "失败"
    }
}

fn status_mark(success: bool) -> &'static str {
    if success {
        "✅ 成功"
    } else {
        "❌ 失败"
    }
}

/// Check-in result message
pub fn sign_in_message(success: bool, message: &str, at: &str) -> PushMessage {
    let title = if success {
        "🎉 掘金签到成功"
    } else {
        "❌ 掘金签到失败"
    };
    let closing = if success {
        "恭喜您完成今日签到！"
    } else {
        "请检查程序运行状态或手动签到。"
    };

    let content = format!(
        "签到时间: {}\n签到状态: {}\n详细信息: {}\n\n{}",
        at,
        status_word(success),
        message,
        closing
    );

    PushMessage {
        title: title.to_string(),
        content,
    }
}

/// Lottery result message; `prize` is the failure reason when unsuccessful
pub fn lottery_message(success: bool, prize: &str, at: &str) -> PushMessage {
    let title = if success {
        "🎁 掘金抽奖成功"
    } else {
        "❌ 掘金抽奖失败"
    };
    let prize_line = if success {
        format!("获得奖品: {}", prize)
    } else {
        format!("失败原因: {}", prize)
    };
    let closing = if success {
        "恭喜您获得奖品！"
    } else {
        "请检查是否还有抽奖次数或手动抽奖。"
    };

    let content = format!(
        "抽奖时间: {}\n抽奖状态: {}\n{}\n\n{}",
        at,
        status_word(success),
        prize_line,
        closing
    );

    PushMessage {
        title: title.to_string(),
        content,
    }
}

/// `label: value`, or an empty line holding its place when there is no value
fn labelled_or_blank(label: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{}: {}", label, value)
    }
}

/// End-of-run report covering both steps
pub fn daily_summary_message(summary: &RunSummary, at: &str) -> PushMessage {
    let mut lines = vec![format!("执行时间: {}", at), String::new()];

    lines.push(format!("📝 签到结果: {}", status_mark(summary.sign_in.success)));
    lines.push(labelled_or_blank("   详情", &summary.sign_in.message));
    lines.push(String::new());

    lines.push(format!("🎲 抽奖结果: {}", status_mark(summary.lottery.success)));
    lines.push(labelled_or_blank("   奖品", &summary.lottery.prize));
    lines.push(String::new());

    let duration = if summary.duration.is_empty() {
        "未知"
    } else {
        summary.duration.as_str()
    };
    lines.push(format!("⏱️ 总耗时: {}", duration));
    lines.push(String::new());

    lines.push(if summary.all_succeeded() {
        "🎉 今日任务全部完成！".to_string()
    } else {
        "⚠️ 部分任务执行失败，请检查日志。".to_string()
    });

    PushMessage {
        title: "📊 掘金自动签到日报".to_string(),
        content: lines.join("\n"),
    }
}

//! Command router: the fixed set of slash commands.
//!
//! Every handler is one store call followed by one reply send; malformed
//! arguments produce a usage hint without touching stored state.

use teloxide::types::ChatId;

use crate::error::Result;
use crate::platform::Messenger;
use crate::store::SettingsStore;

const WELCOME: &str = "👋 欢迎使用AI助手！\n\n\
使用以下命令：\n\
/help - 显示帮助信息\n\
/clear - 清除对话历史\n\
/settings - 查看当前设置\n\
/language - 设置语言\n\
/record - 记录信息\n\
/getrecords - 查询所有已记录的信息\n\n\
直接发送消息即可开始对话！";

const HELP: &str = "📚 命令列表：\n\n\
/start - 显示欢迎信息\n\
/help - 显示此帮助信息\n\
/clear - 清除对话历史\n\
/settings - 查看当前设置\n\
/language - 设置语言\n\
/record - 记录信息\n\
/getrecords - 查询所有已记录的信息\n\n\
💡 提示：直接发送消息即可与AI对话！";

/// Dispatches a command-prefixed message on its first token.
pub async fn handle_command<M: Messenger>(
    messenger: &M,
    store: &SettingsStore,
    chat: ChatId,
    user_id: u64,
    text: &str,
) -> Result<()> {
    let command = text.split(' ').next().unwrap_or("").to_lowercase();

    let reply = match command.as_str() {
        "/start" => WELCOME.to_string(),
        "/help" => HELP.to_string(),
        "/clear" => {
            store.clear_history(user_id);
            "✅ 对话历史已清除！".to_string()
        }
        "/settings" => settings_view(store, user_id),
        "/language" => set_language(store, user_id, text),
        "/record" => add_record(store, user_id, text),
        "/getrecords" => list_records(store, user_id),
        _ => "未知命令。使用 /help 查看可用命令。".to_string(),
    };

    messenger.send_message(chat, &reply).await?;
    Ok(())
}

fn settings_view(store: &SettingsStore, user_id: u64) -> String {
    let profile = store.get_or_create(user_id);
    format!(
        "⚙️ 当前设置：\n\n\
语言：{}\n\
温度：{}\n\
最大回复长度：{}\n\
回复风格：{}\n\n\
使用 /language 命令可以更改语言设置。",
        profile.language, profile.temperature, profile.max_tokens, profile.response_style
    )
}

fn set_language(store: &SettingsStore, user_id: u64, text: &str) -> String {
    let args: Vec<&str> = text.split(' ').collect();
    if args.len() != 2 {
        return "请指定语言代码，例如：/language zh-CN".to_string();
    }

    let mut profile = store.get_or_create(user_id);
    profile.language = args[1].to_string();
    let language = profile.language.clone();
    store.update(user_id, profile);
    format!("✅ 语言已设置为：{language}")
}

fn add_record(store: &SettingsStore, user_id: u64, text: &str) -> String {
    let args: Vec<&str> = text.split(' ').collect();
    if args.len() != 2 {
        return "请给出要记录的信息，例如：/record 一只棕色的狐狸".to_string();
    }

    store.add_record(user_id, args[1]);
    "✅ 记录成功, 使用 /getrecords 获取所有信息".to_string()
}

fn list_records(store: &SettingsStore, user_id: u64) -> String {
    let records = store.list_records(user_id);
    if records.is_empty() {
        return "未获取到任何信息, 使用/record进行记录, 例如：/record 一只棕色的狐狸".to_string();
    }

    let mut reply = String::from("已记录的信息如下:");
    for (i, record) in records.iter().enumerate() {
        reply.push_str(&format!("\n{} - {}", i + 1, record));
    }
    reply
}

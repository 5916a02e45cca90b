use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use reading_time_application::error::ReadingTimeError;
use reading_time_application::input_ports::{
    EstimateReadingTimeInputPort, ManageSettingsInputPort, UpdatePostMetaInputPort,
    WatchPostInputPort,
};
use reading_time_application::models::PostMetaInput;
use reading_time_application::use_cases::{
    EstimateReadingTimeUseCase, ManageSettingsUseCase, UpdatePostMetaUseCase, WatchPostUseCase,
};
use reading_time_infrastructure::file_repository::LocalPostRepository;
use reading_time_infrastructure::file_watcher::PostFileWatchService;
use reading_time_infrastructure::markup::HtmlMarkupProcessor;
use reading_time_infrastructure::meta_store::SidecarPostMetaStore;
use reading_time_infrastructure::settings_store::JsonSettingsStore;
use reading_time_infrastructure::shortcodes::{ShortcodeCall, ShortcodeRegistry};
use reading_time_presentation::dto::{PostMetaDto, ReadingTimeDto, SettingsDto, SettingsPatchDto};
use reading_time_presentation::state::AppState;
use serde::Serialize;
use serde_json::{Map, Value};

const POST_CHANGED_EVENT: &str = "post://changed";
const TEXT_SETTINGS: &[&str] = &[
    "badge_label",
    "badge_label_under_one",
    "badge_position",
    "progress_position",
    "progress_color",
    "progress_bg_color",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct PostChangedEvent {
    path: String,
}

#[derive(Debug, Parser)]
#[command(name = "reading-time-badge", version)]
#[command(about = "Reading time estimates, badges and progress bars for blog posts")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Settings file to read and update
    #[arg(long, env = "RTB_SETTINGS", default_value = "reading-time-badge.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Print the reading time estimate as JSON
    Estimate { post: String },

    /// Print the post HTML with badge and progress bar
    Badge { post: String },

    /// Edit per-post meta; an empty or 0 override clears it
    Override(OverrideArgs),

    /// Show, change or reset the settings file
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Re-estimate whenever the post or its meta changes
    Watch { post: String },
}

#[derive(Debug, PartialEq, Eq, Args)]
struct OverrideArgs {
    post: String,

    /// Reading time in whole minutes (1-999)
    minutes: Option<String>,

    /// Remove the override
    #[arg(long, conflicts_with = "minutes")]
    clear: bool,

    #[arg(long, conflicts_with = "show_badge")]
    hide_badge: bool,

    #[arg(long)]
    show_badge: bool,

    #[arg(long, conflicts_with = "show_progress")]
    hide_progress: bool,

    #[arg(long)]
    show_progress: bool,
}

impl OverrideArgs {
    fn into_input(self) -> (String, PostMetaInput) {
        let override_minutes = if self.clear {
            Some(String::new())
        } else {
            self.minutes
        };
        let input = PostMetaInput {
            override_minutes,
            disable_badge: toggle(self.hide_badge, self.show_badge),
            disable_progress: toggle(self.hide_progress, self.show_progress),
        };
        (self.post, input)
    }
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum SettingsAction {
    /// Print the effective settings
    Show,

    /// Change settings, e.g. `wpm=200 badge_post_types=post,page`
    Set {
        #[arg(required = true, value_parser = parse_key_value)]
        pairs: Vec<(String, String)>,
    },

    /// Delete the settings file and fall back to the defaults
    Reset,
}

fn parse_key_value(pair: &str) -> Result<(String, String), String> {
    pair.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{pair}`"))
}

fn estimate_inner(post: &str, state: &AppState) -> Result<ReadingTimeDto, String> {
    let estimate = state
        .estimate_reading_time
        .execute(post)
        .map_err(to_user_error)?;
    Ok(ReadingTimeDto::render(estimate, &state.badge_hooks))
}

fn badge_inner(post: &str, state: &AppState) -> Result<String, String> {
    let dto = estimate_inner(post, state)?;
    Ok(match dto.progress_bar {
        Some(bar) => format!("{}\n{}", bar.html, dto.content),
        None => dto.content,
    })
}

fn update_meta_inner(
    post: &str,
    input: PostMetaInput,
    state: &AppState,
) -> Result<PostMetaDto, String> {
    let meta = state
        .update_post_meta
        .execute(post, input)
        .map_err(to_user_error)?;
    Ok(meta.into())
}

fn show_settings_inner(state: &AppState) -> SettingsDto {
    state.manage_settings.current().into()
}

fn update_settings_inner(
    pairs: &[(String, String)],
    state: &AppState,
) -> Result<SettingsDto, String> {
    let patch: Map<String, Value> = pairs
        .iter()
        .map(|(key, raw)| (key.clone(), setting_value(key, raw)))
        .collect();
    let patch: SettingsPatchDto =
        serde_json::from_value(Value::Object(patch)).map_err(|error| error.to_string())?;

    let settings = state
        .manage_settings
        .update(patch.into())
        .map_err(to_user_error)?;
    Ok(settings.into())
}

fn reset_settings_inner(state: &AppState) -> Result<SettingsDto, String> {
    let settings = state.manage_settings.reset().map_err(to_user_error)?;
    Ok(settings.into())
}

fn setting_value(key: &str, raw: &str) -> Value {
    if key.ends_with("_post_types") {
        return Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }
    if TEXT_SETTINGS.contains(&key) {
        return Value::String(raw.to_string());
    }

    match raw.trim() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        number => number
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

fn start_watch_inner<F>(
    post: &str,
    watch_use_case: &dyn WatchPostInputPort,
    emit: F,
) -> Result<(), String>
where
    F: Fn(&str, PostChangedEvent) + Send + Sync + 'static,
{
    let on_changed = build_watch_callback(emit);
    watch_use_case.start(post, on_changed).map_err(to_user_error)
}

fn stop_watch_inner(watch_use_case: &dyn WatchPostInputPort) {
    watch_use_case.stop();
}

fn build_watch_callback<F>(emit: F) -> Arc<dyn Fn(String) + Send + Sync>
where
    F: Fn(&str, PostChangedEvent) + Send + Sync + 'static,
{
    Arc::new(move |path: String| {
        emit(POST_CHANGED_EVENT, PostChangedEvent { path });
    })
}

fn to_user_error(error: ReadingTimeError) -> String {
    error.to_string()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|error| error.to_string())
}

fn caption_shortcode(call: &ShortcodeCall<'_>) -> String {
    call.content.unwrap_or_default().to_string()
}

/// Shortcodes the shell knows how to run. Everything else stays literal text.
fn default_shortcodes() -> ShortcodeRegistry {
    ShortcodeRegistry::new().register("caption", Arc::new(caption_shortcode))
}

fn build_state(settings_store: Arc<JsonSettingsStore>) -> AppState {
    let repository = Arc::new(LocalPostRepository::new());
    let meta_store = Arc::new(SidecarPostMetaStore::new());
    let markup = Arc::new(HtmlMarkupProcessor::new());
    let shortcodes = Arc::new(default_shortcodes());
    let watch_service = Arc::new(PostFileWatchService::new());

    let estimate_use_case: Arc<dyn EstimateReadingTimeInputPort> =
        Arc::new(EstimateReadingTimeUseCase::new(
            Arc::clone(&repository) as Arc<_>,
            Arc::clone(&meta_store) as Arc<_>,
            Arc::clone(&settings_store) as Arc<_>,
            markup,
            shortcodes,
        ));
    let meta_use_case: Arc<dyn UpdatePostMetaInputPort> =
        Arc::new(UpdatePostMetaUseCase::new(repository, meta_store));
    let settings_use_case: Arc<dyn ManageSettingsInputPort> =
        Arc::new(ManageSettingsUseCase::new(settings_store));
    let watch_use_case: Arc<dyn WatchPostInputPort> =
        Arc::new(WatchPostUseCase::new(watch_service));

    AppState::new(
        estimate_use_case,
        meta_use_case,
        settings_use_case,
        watch_use_case,
    )
}

fn watch(post: &str, state: &AppState) -> Result<(), String> {
    println!("{}", to_json(&estimate_inner(post, state)?)?);

    let (sender, receiver) = mpsc::channel::<PostChangedEvent>();
    let sender = Mutex::new(sender);
    start_watch_inner(post, state.watch_post.as_ref(), move |event, payload| {
        debug!("{event} {}", payload.path);
        if let Ok(sender) = sender.lock() {
            let _ = sender.send(payload);
        }
    })?;

    for change in receiver {
        match estimate_inner(&change.path, state) {
            Ok(estimate) => println!("{}", to_json(&estimate)?),
            Err(error) => eprintln!("{error}"),
        }
    }

    stop_watch_inner(state.watch_post.as_ref());
    Ok(())
}

fn dispatch(command: Commands, state: &AppState) -> Result<Option<String>, String> {
    match command {
        Commands::Estimate { post } => to_json(&estimate_inner(&post, state)?).map(Some),
        Commands::Badge { post } => badge_inner(&post, state).map(Some),
        Commands::Override(args) => {
            let (post, input) = args.into_input();
            to_json(&update_meta_inner(&post, input, state)?).map(Some)
        }
        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => to_json(&show_settings_inner(state)).map(Some),
            SettingsAction::Set { pairs } => {
                to_json(&update_settings_inner(&pairs, state)?).map(Some)
            }
            SettingsAction::Reset => to_json(&reset_settings_inner(state)?).map(Some),
        },
        Commands::Watch { post } => watch(&post, state).map(|()| None),
    }
}

/// Runs one command line (program name first) and returns the exit code.
pub fn run(args: Vec<String>) -> i32 {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };

    let settings_store = Arc::new(JsonSettingsStore::new(cli.settings));
    debug!("settings file {}", settings_store.path().display());
    let state = build_state(settings_store);

    match dispatch(cli.command, &state) {
        Ok(Some(output)) => {
            println!("{output}");
            0
        }
        Ok(None) => 0,
        Err(error) => {
            info!("command failed: {error}");
            eprintln!("{error}");
            1
        }
    }
}

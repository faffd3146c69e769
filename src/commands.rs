//! サブコマンドの実行
//!
//! 保護コマンドは実行前にガードを通す。画面ごとの射影と失敗時メッセージは
//! Web版と共通のものを使う。

use crate::cli::{Cli, Commands, OutputFormat};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{DashError, Result};
use crate::render;
use crate::session_file::FileStore;
use arbitrage_common::projection::{
    BATCH_DISCOVERY_FAILED_MESSAGE, DISCOVERY_FAILED_MESSAGE, FETCH_ITEMS_FAILED_MESSAGE,
    FETCH_ROUTE_ITEMS_FAILED_MESSAGE, ROI_FAILED_MESSAGE, ROUTE_FAILED_MESSAGE,
    SELECTION_TOO_SMALL_MESSAGE, VERIFICATION_FAILED_MESSAGE,
};
use arbitrage_common::session::{LOGIN_FAILED_MESSAGE, REGISTER_FAILED_MESSAGE};
use arbitrage_common::{
    build_route_request, geocoded_projection, list_projection, parse_url_list,
    validate_listing_url, Coordinate, DiscoveryOutcome, Error, GuardOutcome, HallmarkFinding,
    ItemReference, LoginForm, RegisterForm, RoiForm, RoiResult, Route, Selection, Session,
    SessionStore,
};
use dialoguer::{Input, Password};
use std::path::Path;
use tracing::info;

const CURRENT_USER_FAILED_MESSAGE: &str = "Failed to fetch the current user.";

/// 保護コマンドのガード
pub fn guard<S: SessionStore>(session: &Session<S>, route: Route) -> Result<()> {
    match session.guard(route) {
        GuardOutcome::Render(_) => Ok(()),
        GuardOutcome::Redirect(_) => Err(DashError::LoginRequired),
    }
}

/// CLI全体の入口
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let api = config.resolve_api(cli.api_url.as_deref());
    let store = FileStore::in_dir(&Config::config_dir()?);
    info!(api_url = api.base_url(), session = %store.path().display(), "起動");

    match cli.command {
        Commands::Config { set_api_url, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  APIのURL（設定ファイル）: {}", config.api_url.as_deref().unwrap_or("未設定"));
                println!("  APIのURL（使用中）: {}", api.base_url());
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
            Ok(())
        }

        Commands::Status => {
            let session = Session::new(store);
            print_status(&session, api.base_url());
            Ok(())
        }

        command => {
            let client = ApiClient::new(api, Session::new(store));
            execute(&client, command).await
        }
    }
}

fn print_status(session: &Session<FileStore>, api_url: &str) {
    println!("API: {}", api_url);
    println!("セッションファイル: {}", session.store().path().display());
    if session.is_authenticated() {
        let stored_at = session
            .store()
            .stored_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "不明".to_string());
        println!("✔ ログイン済み（保存: {}）", stored_at);
    } else {
        println!("✗ 未ログイン");
    }
}

/// ネットワークを使うコマンドの実行
pub async fn execute<S: SessionStore>(client: &ApiClient<S>, command: Commands) -> Result<()> {
    if let Some(route) = command.route() {
        guard(client.session(), route)?;
    }

    match command {
        Commands::Login { username, password } => {
            let username = prompt_or(username, "Username")?;
            let password = password_or(password, "Password")?;
            let pb = render::spinner("ログイン中...");
            let result = login(client, &LoginForm::new(username, password)).await;
            pb.finish_and_clear();
            result?;
            println!("✅ ログインしました");
        }

        Commands::Register { username, email, full_name, password, confirm_password } => {
            let form = RegisterForm {
                username: prompt_or(username, "Username")?,
                email: prompt_or(email, "Email")?,
                full_name: match full_name {
                    Some(name) => name,
                    None => prompt_optional("Full Name (Optional)")?,
                },
                confirm_password: match (&password, confirm_password) {
                    (Some(password), None) => password.clone(),
                    (_, Some(confirm)) => confirm,
                    (None, None) => String::new(),
                },
                password: password_or(password, "Password")?,
            };
            let form = if form.confirm_password.is_empty() {
                RegisterForm {
                    confirm_password: password_or(None, "Confirm Password")?,
                    ..form
                }
            } else {
                form
            };

            let pb = render::spinner("登録中...");
            let result = register(client, &form).await;
            pb.finish_and_clear();
            result?;
            println!("✅ Registration successful! `arbitrage-dash login` でログインしてください");
        }

        Commands::Logout => {
            client.session().logout()?;
            println!("✔ ログアウトしました");
        }

        Commands::Whoami => {
            let pb = render::spinner("取得中...");
            let result = client.current_user().await;
            pb.finish_and_clear();
            let user = result.map_err(|e| DashError::api(e, CURRENT_USER_FAILED_MESSAGE))?;
            println!("{}", render::profile(&user));
        }

        Commands::Items { format } => {
            let pb = render::spinner("アイテムを取得中...");
            let result = client.list_items().await;
            pb.finish_and_clear();
            let mut items = result.map_err(|e| DashError::api(e, FETCH_ITEMS_FAILED_MESSAGE))?;

            match format {
                OutputFormat::Text => {
                    let entries = list_projection(&items);
                    println!("📋 Discovered Items ({}件)\n", entries.len());
                    println!("{}", render::items(&entries));
                }
                OutputFormat::Json => {
                    items.sort_by(|a, b| b.id.cmp(&a.id));
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
            }
        }

        Commands::Discover { url } => {
            let pb = render::spinner("Discovering...");
            let result = discover(client, &url).await;
            pb.finish_and_clear();
            let reference = result?;
            match reference.id {
                Some(id) => println!("✅ 解析を開始しました (Item ID: {}, Status: {})", id, reference.status),
                None => println!("✅ 解析を開始しました (Status: {})", reference.status),
            }
        }

        Commands::DiscoverMany { urls, file } => {
            let text = match file {
                Some(path) => read_url_file(&path)?,
                None => urls.join("\n"),
            };
            let pb = render::spinner("Discovering Multiple Items...");
            let result = discover_many(client, &text).await;
            pb.finish_and_clear();
            let outcomes = result?;

            println!("Discovery Results:");
            for outcome in &outcomes {
                println!("{}", render::outcome_line(outcome));
            }
            let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
            println!("\n✔ {}/{}件 成功", succeeded, outcomes.len());
        }

        Commands::Route { select } => {
            if select.is_empty() {
                let pb = render::spinner("候補を取得中...");
                let result = client.list_items().await;
                pb.finish_and_clear();
                let items =
                    result.map_err(|e| DashError::api(e, FETCH_ROUTE_ITEMS_FAILED_MESSAGE))?;
                let candidates = geocoded_projection(&items);
                println!("Select Items for Route:");
                println!("{}", render::route_candidates(&candidates, &Selection::new()));
                println!("\n`arbitrage-dash route --select <ID>,<ID>` で2件以上選んでください");
                return Ok(());
            }

            let pb = render::spinner("Optimizing...");
            let result = optimize_route(client, &select).await;
            pb.finish_and_clear();
            let stops = result?;
            println!("Optimized Route:");
            println!("{}", render::stops(&stops));
        }

        Commands::Valuation { weight, purity, price } => {
            let form = RoiForm {
                weight_grams: weight,
                purity,
                purchase_price: price,
            };
            let pb = render::spinner("Calculating...");
            let result = valuate(client, &form).await;
            pb.finish_and_clear();
            println!("Valuation Result:");
            println!("{}", render::roi(&result?));
        }

        Commands::Verify { image } => {
            let pb = render::spinner("Analyzing...");
            let result = verify_image(client, &image).await;
            pb.finish_and_clear();
            println!("Analysis Result:");
            println!("{}", render::findings(&result?));
        }

        Commands::Status | Commands::Config { .. } => {
            return Err(DashError::Config("ローカルコマンドはAPIを使いません".into()));
        }
    }

    Ok(())
}

pub async fn login<S: SessionStore>(client: &ApiClient<S>, form: &LoginForm) -> Result<()> {
    client
        .login(form)
        .await
        .map(|_| ())
        .map_err(|e| DashError::api(e, LOGIN_FAILED_MESSAGE))
}

/// パスワード不一致はネットワークに出る前に弾く
pub async fn register<S: SessionStore>(client: &ApiClient<S>, form: &RegisterForm) -> Result<()> {
    let request = form
        .validate()
        .map_err(|e| DashError::api(e, REGISTER_FAILED_MESSAGE))?;
    client
        .register(&request)
        .await
        .map_err(|e| DashError::api(e, REGISTER_FAILED_MESSAGE))
}

pub async fn discover<S: SessionStore>(client: &ApiClient<S>, url: &str) -> Result<ItemReference> {
    let url = validate_listing_url(url).map_err(|e| DashError::api(e, DISCOVERY_FAILED_MESSAGE))?;
    client
        .discover(&url)
        .await
        .map_err(|e| DashError::api(e, DISCOVERY_FAILED_MESSAGE))
}

pub async fn discover_many<S: SessionStore>(
    client: &ApiClient<S>,
    text: &str,
) -> Result<Vec<DiscoveryOutcome>> {
    let urls = parse_url_list(text).map_err(|e| DashError::api(e, BATCH_DISCOVERY_FAILED_MESSAGE))?;
    client
        .discover_multiple(urls)
        .await
        .map_err(|e| DashError::api(e, BATCH_DISCOVERY_FAILED_MESSAGE))
}

/// 選択順にルートを組む。2件未満なら一覧も取らずに失敗する。
pub async fn optimize_route<S: SessionStore>(
    client: &ApiClient<S>,
    ids: &[i64],
) -> Result<Vec<Coordinate>> {
    let selection: Selection = ids.iter().copied().collect();
    if !selection.can_submit() {
        let error = Error::Validation(SELECTION_TOO_SMALL_MESSAGE.to_string());
        return Err(DashError::api(error, ROUTE_FAILED_MESSAGE));
    }

    let items = client
        .list_items()
        .await
        .map_err(|e| DashError::api(e, FETCH_ROUTE_ITEMS_FAILED_MESSAGE))?;
    let candidates = geocoded_projection(&items);
    let request = build_route_request(&selection, &candidates)
        .map_err(|e| DashError::api(e, ROUTE_FAILED_MESSAGE))?;

    let route = client
        .optimize_route(&request)
        .await
        .map_err(|e| DashError::api(e, ROUTE_FAILED_MESSAGE))?;
    Ok(route.stops())
}

pub async fn valuate<S: SessionStore>(client: &ApiClient<S>, form: &RoiForm) -> Result<RoiResult> {
    let request = form.to_request().map_err(|e| DashError::api(e, ROI_FAILED_MESSAGE))?;
    client
        .calculate_roi(&request)
        .await
        .map_err(|e| DashError::api(e, ROI_FAILED_MESSAGE))
}

pub async fn verify_image<S: SessionStore>(
    client: &ApiClient<S>,
    path: &Path,
) -> Result<Vec<HallmarkFinding>> {
    if !path.is_file() {
        return Err(DashError::FileNotFound(path.display().to_string()));
    }
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let result = client
        .analyze_image(&file_name, bytes)
        .await
        .map_err(|e| DashError::api(e, VERIFICATION_FAILED_MESSAGE))?;
    Ok(result.findings())
}

fn read_url_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(DashError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn prompt_or(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| DashError::Prompt(e.to_string())),
    }
}

fn prompt_optional(prompt: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| DashError::Prompt(e.to_string()))
}

fn password_or(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| DashError::Prompt(e.to_string())),
    }
}

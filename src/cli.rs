use arbitrage_common::projection::DEFAULT_PURITY;
use arbitrage_common::Route;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arbitrage-dash")]
#[command(about = "Arbitrage OS ダッシュボード（ターミナル版）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのベースURL（環境変数・設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ログインしてトークンを保存
    Login {
        /// ユーザー名（省略時は入力を求める）
        #[arg(short, long)]
        username: Option<String>,

        /// パスワード（省略時は入力を求める）
        #[arg(short, long)]
        password: Option<String>,
    },

    /// アカウント登録
    Register {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// 氏名（任意）
        #[arg(long)]
        full_name: Option<String>,

        /// パスワード（省略時は確認付きで入力を求める）
        #[arg(short, long)]
        password: Option<String>,

        /// 確認用パスワード（--password 指定時のみ）
        #[arg(long, requires = "password")]
        confirm_password: Option<String>,
    },

    /// 保存済みトークンを削除
    Logout,

    /// ログイン状態を表示
    Status,

    /// ログイン中のユーザー情報
    Whoami,

    /// 発見済みアイテム一覧
    Items {
        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// 出品URLを1件解析
    Discover {
        #[arg(required = true)]
        url: String,
    },

    /// 出品URLをまとめて解析
    DiscoverMany {
        /// URL（複数可）
        urls: Vec<String>,

        /// 1行1URLのファイル
        #[arg(short, long, conflicts_with = "urls")]
        file: Option<PathBuf>,
    },

    /// 選択アイテムの巡回ルートを最適化（未指定なら候補一覧）
    Route {
        /// アイテムID（指定順に巡回候補へ追加）
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<i64>,
    },

    /// 銀の溶解価値とROIを計算
    Valuation {
        /// 重量（グラム）
        #[arg(short, long)]
        weight: String,

        /// 純度
        #[arg(short = 'u', long, default_value = DEFAULT_PURITY)]
        purity: String,

        /// 購入価格
        #[arg(short, long)]
        price: String,
    },

    /// 刻印画像を解析
    Verify {
        #[arg(required = true)]
        image: PathBuf,
    },

    /// 設定を管理
    Config {
        /// バックエンドURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// ガード対象の画面。`None` はログイン不要。
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Whoami | Commands::Items { .. } => Some(Route::Dashboard),
            Commands::Discover { .. } => Some(Route::Discover),
            Commands::DiscoverMany { .. } => Some(Route::MultiDiscover),
            Commands::Route { .. } => Some(Route::Logistics),
            Commands::Valuation { .. } => Some(Route::Valuation),
            Commands::Verify { .. } => Some(Route::Verification),
            Commands::Login { .. }
            | Commands::Register { .. }
            | Commands::Logout
            | Commands::Status
            | Commands::Config { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "t" => Ok(OutputFormat::Text),
            "json" | "j" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_select_keeps_order() {
        let args = ["arbitrage-dash", "route", "--select", "3,1", "--select", "2"];
        let cli = Cli::try_parse_from(args).expect("引数解析失敗");
        match cli.command {
            Commands::Route { select } => assert_eq!(select, vec![3, 1, 2]),
            _ => panic!("route 以外に解析された"),
        }
    }

    #[test]
    fn test_protected_commands() {
        let cli = Cli::try_parse_from(["arbitrage-dash", "items"]).expect("引数解析失敗");
        assert_eq!(cli.command.route(), Some(Route::Dashboard));

        let cli = Cli::try_parse_from(["arbitrage-dash", "login", "-u", "alice"]).expect("引数解析失敗");
        assert_eq!(cli.command.route(), None);
    }

    #[test]
    fn test_valuation_default_purity() {
        let cli = Cli::try_parse_from(["arbitrage-dash", "valuation", "-w", "31.1", "-p", "10"])
            .expect("引数解析失敗");
        match cli.command {
            Commands::Valuation { purity, .. } => assert_eq!(purity, "0.925"),
            _ => panic!("valuation 以外に解析された"),
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}

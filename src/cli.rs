use crate::inspect::HashTiming;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pswp-gallery")]
#[command(about = "PhotoSwipeギャラリーのオープン位置・ディープリンク検証ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// マニフェストのギャラリーを再現し、ビューアの生成パラメータをJSONで出力
    Resolve {
        /// ギャラリーマニフェスト（JSON）
        #[arg(required = true)]
        manifest: PathBuf,

        /// URLフラグメント（例: "#gid=g1&pid=3"）
        #[arg(long)]
        hash: Option<String>,

        /// ハッシュ起動のタイミング (before/after)
        #[arg(long, default_value = "after")]
        hash_timing: HashTiming,

        /// 識別子で開く
        #[arg(long)]
        pid: Option<String>,

        /// インデックスで開く
        #[arg(long, allow_hyphen_values = true)]
        index: Option<i64>,

        /// クリックするアイテム（items の添字）
        #[arg(long)]
        item: Option<usize>,

        /// クリック位置 "X,Y"
        #[arg(long)]
        pointer: Option<String>,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 整形せずに出力
        #[arg(long)]
        compact: bool,
    },

    /// 設定管理
    Config {
        /// 既定のビューア設定を追加 (KEY=JSON)
        #[arg(long)]
        set_option: Vec<String>,

        /// 既定のビューア設定を削除
        #[arg(long)]
        unset_option: Vec<String>,

        /// 出力JSONの整形 (true/false)
        #[arg(long)]
        pretty: Option<bool>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

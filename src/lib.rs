//! local-localizator
//!
//! 翻訳プロジェクト (言語・キー・値) を暗号化して保存し、言語ごとの JSON ファイルへ書き出すライブラリ

pub mod config;
pub mod convert;
pub mod crypto;
pub mod project;
pub mod stats;
pub mod storage;
pub mod template;
pub mod types;

//! 本地存储 - 业务能力层
//!
//! 只负责"按键读写 JSON"能力，不关心存的是什么。
//! 每个键对应数据目录下的一个 `.json` 文件，后写覆盖先写。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// 会话状态键
pub const SESSION_KEY: &str = "examGenie_session";

/// 本地单用户的固定 ID
pub const LOCAL_USER_ID: &str = "local_user";

pub fn profile_key(uid: &str) -> String {
    format!("examGenie_profile_{}", uid)
}

pub fn history_key(uid: &str) -> String {
    format!("examGenie_history_{}", uid)
}

pub fn txns_key(uid: &str) -> String {
    format!("examGenie_txns_{}", uid)
}

/// 最近一次生成、尚未作答的试卷
pub fn current_paper_key(uid: &str) -> String {
    format!("examGenie_current_{}", uid)
}

/// 目录存储
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// 打开（必要时创建）数据目录
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", file_name))
    }

    /// 读取键，不存在返回 `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let value = serde_json::from_str(&content).map_err(|source| StoreError::Serde {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    /// 写入键
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serde {
            key: key.to_string(),
            source,
        })?;

        let path = self.path_for(key);
        debug!("写入存储: {} ({} 字节)", key, content.len());
        fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// 删除键，不存在时什么也不做
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// 删除所有键
    pub fn clear(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.root.display().to_string(),
            source,
        };

        for entry in fs::read_dir(&self.root).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|source| StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

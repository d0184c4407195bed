use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, instrument, warn};

use crate::ledger::{CategoryLimits, UsageLedger};

use super::entities::{LedgerEntity, RawLedgerEntity};

pub const LEDGER_FILE: &str = "ledger.json";
const CORRUPTED_SUFFIX: &str = "corrupted";
const TEMP_SUFFIX: &str = "tmp";

/// Interface for abstracting storage of the ledger. The ledger is always read and written as a
/// whole.
pub trait LedgerStorage {
    /// Reads the whole ledger. Missing or unreadable data results in an empty ledger instead of an
    /// error.
    fn load(&self, limits: CategoryLimits) -> impl Future<Output = Result<UsageLedger>>;

    /// Replaces stored data with `ledger`.
    fn save(&self, ledger: &UsageLedger) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> LedgerStorage for T
where
    T::Target: LedgerStorage,
{
    fn load(&self, limits: CategoryLimits) -> impl Future<Output = Result<UsageLedger>> {
        self.deref().load(limits)
    }

    fn save(&self, ledger: &UsageLedger) -> impl Future<Output = Result<()>> {
        self.deref().save(ledger)
    }
}

/// The main realization of [LedgerStorage]. Keeps the ledger in a single json file.
pub struct JsonLedgerStorage {
    path: PathBuf,
}

impl JsonLedgerStorage {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join(LEDGER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_locked(path: &Path) -> std::io::Result<Vec<u8>> {
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut content = Vec::new();
        let result = file.read_to_end(&mut content).await;
        file.unlock_async().await?;
        result.map(|_| content)
    }

    /// Keeps a copy of a ledger we failed to read or parse, it's going to be overwritten on the
    /// next save.
    async fn preserve_corrupted(&self) {
        let backup = self.path.with_extension(CORRUPTED_SUFFIX);
        if let Err(e) = tokio::fs::copy(&self.path, &backup).await {
            warn!("Failed to back up corrupted ledger to {backup:?}: {e}");
        } else {
            warn!("Corrupted ledger was copied to {backup:?}");
        }
    }

    async fn write_with_file(file: &mut (impl AsyncWrite + Unpin), buffer: &[u8]) -> Result<()> {
        file.write_all(buffer).await?;
        file.flush().await?;
        Ok(())
    }

    async fn replace_through(&self, temp: &Path, buffer: &[u8]) -> Result<()> {
        let mut file = File::create(temp).await?;
        file.lock_exclusive()?;
        let result = Self::write_with_file(&mut file, buffer).await;
        file.unlock_async().await?;
        result?;
        drop(file);

        tokio::fs::rename(temp, &self.path).await?;
        Ok(())
    }
}

impl LedgerStorage for JsonLedgerStorage {
    #[instrument(skip(self, limits), fields(path = ?self.path))]
    async fn load(&self, limits: CategoryLimits) -> Result<UsageLedger> {
        let content = match Self::read_locked(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ledger yet, starting empty");
                return Ok(UsageLedger::new(limits));
            }
            Err(e) => {
                warn!("Failed to read ledger, starting empty: {e}");
                self.preserve_corrupted().await;
                return Ok(UsageLedger::new(limits));
            }
        };

        let raw = match serde_json::from_slice::<RawLedgerEntity>(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!("Ledger is not valid json, starting empty: {e}");
                self.preserve_corrupted().await;
                return Ok(UsageLedger::new(limits));
            }
        };

        let ledger = UsageLedger::from_records(limits, raw.into_records());
        debug!("Loaded {} days", ledger.len());
        Ok(ledger)
    }

    #[instrument(skip_all, fields(path = ?self.path))]
    async fn save(&self, ledger: &UsageLedger) -> Result<()> {
        let mut buffer = serde_json::to_vec_pretty(&LedgerEntity::from(ledger))?;
        buffer.push(b'\n');

        // Written next to the ledger and renamed over it, so a crash never leaves half a file.
        let temp = self.path.with_extension(TEMP_SUFFIX);
        if let Err(e) = self.replace_through(&temp, &buffer).await {
            match tokio::fs::remove_file(&temp).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!("Failed to remove {temp:?}: {cleanup}");
                }
                _ => {}
            }
            return Err(e);
        }
        debug!("Saved {} days", ledger.len());
        Ok(())
    }
}

use std::thread;

use libc::SIGUSR1;
use signal_hook::iterator::Signals;
use tracing::info;

use crate::error::{Error, Result};
use crate::table::Snapshot;

/// SIGUSR1 を受け取るたびに卓の様子をログに出すスレッドを起動する
///
/// ```text
/// $ kill -USR1 <pid>
/// ```
pub fn spawn_reporter<F>(snapshot: F) -> Result<()>
where
    F: Fn() -> Snapshot + Send + 'static,
{
    let mut signals = Signals::new([SIGUSR1]).map_err(Error::Signal)?;
    thread::Builder::new()
        .name("reporter".into())
        .spawn(move || {
            for sig in signals.forever() {
                let snap = snapshot();
                info!(signal = sig, table = %snap, "snapshot");
            }
        })
        .map_err(Error::Spawn)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::table::Table;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    #[test]
    fn test_reports_on_sigusr1() {
        let table = Arc::new(Table::new(3));
        table.acquire(1);

        let (tx, rx) = mpsc::channel();
        let table0 = table.clone();
        spawn_reporter(move || {
            let snap = table0.snapshot();
            let _ = tx.send(snap.clone());
            snap
        })
        .unwrap();

        signal_hook::low_level::raise(SIGUSR1).unwrap();

        let snap = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(snap.to_string(), "[. E .] meals=[0, 1, 0]");
    }
}

use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::debug;

use crate::ring::{left, right};
use crate::table::{Snapshot, State, Status};

/// タスク用のモニタ
/// プロトコルは Table と同じで、待機だけがスレッドのブロックからタスクの中断に変わる
///
/// ロック中に await しないので std::sync::Mutex で問題ない
pub struct AsyncTable {
    state: Mutex<State>,
    signal: Vec<Notify>,
}

impl AsyncTable {
    /// # Panics
    ///
    /// n が 0 の場合
    pub fn new(n: usize) -> Self {
        assert!(n > 0);
        AsyncTable {
            state: Mutex::new(State::new(n)),
            signal: (0..n).map(|_| Notify::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    // ロック獲得中に呼ぶこと
    // 待機中のタスクがいなければ notify_one は許可を 1 つ残すので、
    // ロック解放から await までの間に起こされても取りこぼさない
    fn test(&self, state: &mut State, i: usize) {
        if state.admit(i) {
            debug!(philosopher = i, "admitted");
            self.signal[i].notify_one();
        }
    }

    // ロック獲得中に呼ぶこと
    fn put_down(&self, state: &mut State, i: usize) {
        state.put_down(i);

        let n = state.len();
        self.test(state, left(i, n));
        self.test(state, right(i, n));

        debug_assert!(state.is_exclusive());
    }

    /// 両隣の箸を取る
    ///
    /// 完了前に future が破棄された場合は、待機をやめて Idle に戻る。
    /// 既に食事中になっていた場合は箸を置く
    pub async fn acquire(&self, i: usize) {
        {
            let mut state = self.state.lock().unwrap();
            state.hunger(i);
            self.test(&mut state, i);
        }

        let mut pending = Pending {
            table: self,
            i,
            armed: true,
        };

        loop {
            let notified = {
                let state = self.state.lock().unwrap();
                if state.status(i) == Status::Active {
                    debug_assert!(state.is_exclusive());
                    pending.armed = false;
                    return;
                }
                self.signal[i].notified()
            };

            // 古い許可で起こされることもあるので、ループで状態を確認し直す
            notified.await;
            debug!(philosopher = i, "woke up");
        }
    }

    pub fn release(&self, i: usize) {
        let mut state = self.state.lock().unwrap();
        self.put_down(&mut state, i);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().snapshot()
    }
}

// acquire が完了せずに破棄されたときの後始末
struct Pending<'a> {
    table: &'a AsyncTable,
    i: usize,
    armed: bool,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        // ロックが poison されていれば、どのみち他の哲学者も続行できない
        let mut state = match self.table.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };

        match state.status(self.i) {
            Status::Waiting => state.give_up(self.i),
            Status::Active => self.table.put_down(&mut state, self.i),
            Status::Idle => {}
        }
        debug!(philosopher = self.i, "acquire cancelled");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use Status::{Active, Idle, Waiting};

    #[tokio::test]
    async fn test_acquire_with_idle_neighbors() {
        let table = AsyncTable::new(5);
        table.acquire(0).await;
        table.acquire(2).await;
        assert_eq!(
            table.snapshot().status,
            vec![Active, Idle, Active, Idle, Idle]
        );
    }

    #[tokio::test]
    async fn test_blocked_then_admitted_on_release() {
        let table = Arc::new(AsyncTable::new(5));
        table.acquire(0).await;

        let table0 = table.clone();
        let t = tokio::spawn(async move { table0.acquire(1).await });

        while table.snapshot().status[1] != Waiting {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            table.snapshot().status,
            vec![Active, Waiting, Idle, Idle, Idle]
        );

        table.release(0);
        tokio::time::timeout(Duration::from_secs(5), t)
            .await
            .expect("philosopher 1 was not woken")
            .unwrap();
        assert_eq!(
            table.snapshot().status,
            vec![Idle, Active, Idle, Idle, Idle]
        );
    }

    #[tokio::test]
    async fn test_cancelled_while_waiting_returns_to_idle() {
        let table = AsyncTable::new(5);
        table.acquire(0).await;

        let r = tokio::time::timeout(Duration::from_millis(10), table.acquire(1)).await;
        assert!(r.is_err());
        assert_eq!(
            table.snapshot().status,
            vec![Active, Idle, Idle, Idle, Idle]
        );

        // 1 が食事中のまま取り残されると、2 は永遠に待つ
        table.release(0);
        assert_eq!(table.snapshot().status, vec![Idle; 5]);
        tokio::time::timeout(Duration::from_secs(5), table.acquire(2))
            .await
            .expect("philosopher 2 blocked by an abandoned acquire");
        assert_eq!(
            table.snapshot().status,
            vec![Idle, Idle, Active, Idle, Idle]
        );
    }

    #[tokio::test]
    async fn test_cancelled_after_admission_puts_forks_down() {
        let table = AsyncTable::new(5);
        table.acquire(0).await;

        let mut fut = Box::pin(table.acquire(1));
        assert!(futures::poll!(fut.as_mut()).is_pending());

        // 起こされる前に破棄する
        table.release(0);
        assert_eq!(
            table.snapshot().status,
            vec![Idle, Active, Idle, Idle, Idle]
        );
        drop(fut);

        let snap = table.snapshot();
        assert_eq!(snap.status, vec![Idle; 5]);
        assert_eq!(snap.meals, vec![1, 1, 0, 0, 0]);

        table.acquire(2).await;
        table.acquire(0).await;
        assert_eq!(
            table.snapshot().status,
            vec![Active, Idle, Active, Idle, Idle]
        );
    }

    #[test]
    #[should_panic]
    fn test_empty_table_panics() {
        AsyncTable::new(0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_deadlock_across_tasks() {
        const NUM_LOOP: u64 = 500;

        for n in 3..=8 {
            let table = Arc::new(AsyncTable::new(n));
            let mut v = Vec::new();
            for i in 0..n {
                let table0 = table.clone();
                v.push(tokio::spawn(async move {
                    for _ in 0..NUM_LOOP {
                        table0.acquire(i).await;
                        assert!(table0.snapshot().is_exclusive());
                        tokio::task::yield_now().await;
                        table0.release(i);
                    }
                }));
            }

            let all = futures::future::join_all(v);
            for r in tokio::time::timeout(Duration::from_secs(30), all)
                .await
                .expect("deadlock")
            {
                r.unwrap();
            }

            let snap = table.snapshot();
            assert_eq!(snap.status, vec![Idle; n]);
            assert_eq!(snap.meals, vec![NUM_LOOP; n]);
        }
    }
}

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::async_table::AsyncTable;
use crate::config::{Config, DurationRange};
use crate::error::{Error, Result};
use crate::table::{Snapshot, Table};

// rounds が None なら終わらない
fn keep_going(rounds: Option<u64>, done: u64) -> bool {
    rounds.map_or(true, |r| done < r)
}

// 考える時間や食べる時間を決めて知らせる
fn pick_duration(i: usize, activity: &str, range: &DurationRange) -> Duration {
    let duration = range.sample();
    info!(
        philosopher = i,
        duration_ms = duration.as_millis() as u64,
        "{activity}"
    );
    duration
}

/// 考える -> 箸を取る -> 食べる -> 箸を置く を繰り返す
/// ロックを持ったまま考えたり食べたりはしない
pub fn philosopher(table: &Table, i: usize, config: &Config) -> u64 {
    let mut done = 0;
    while keep_going(config.rounds, done) {
        thread::sleep(pick_duration(i, "thinking", &config.think));

        info!(philosopher = i, "hungry");
        table.acquire(i);

        thread::sleep(pick_duration(i, "eating", &config.eat));
        table.release(i);

        done += 1;
    }

    info!(philosopher = i, rounds = done, "done");
    done
}

/// 哲学者ごとにスレッドを生成し、全員の終了を待つ
pub fn run_threads(table: Arc<Table>, config: &Config) -> Result<Snapshot> {
    let mut v = Vec::new();
    for i in 0..table.len() {
        let table0 = table.clone();
        let config0 = config.clone();
        let th = thread::Builder::new()
            .name(format!("philosopher-{i}"))
            .spawn(move || philosopher(&table0, i, &config0))
            .map_err(Error::Spawn)?;
        v.push(th);
    }

    for (i, th) in v.into_iter().enumerate() {
        if th.join().is_err() {
            warn!(philosopher = i, "thread panicked");
            return Err(Error::ActorPanicked(i));
        }
    }

    Ok(table.snapshot())
}

/// タスク版。待機とスリープで中断するだけで、手順はスレッド版と同じ
pub async fn philosopher_task(table: Arc<AsyncTable>, i: usize, config: Config) -> u64 {
    let mut done = 0;
    while keep_going(config.rounds, done) {
        tokio::time::sleep(pick_duration(i, "thinking", &config.think)).await;

        info!(philosopher = i, "hungry");
        table.acquire(i).await;

        tokio::time::sleep(pick_duration(i, "eating", &config.eat)).await;
        table.release(i);

        done += 1;
    }

    info!(philosopher = i, rounds = done, "done");
    done
}

/// 哲学者ごとにタスクを生成し、全員の終了を待つ
pub async fn run_tasks(table: Arc<AsyncTable>, config: &Config) -> Result<Snapshot> {
    let handles = (0..table.len())
        .map(|i| tokio::spawn(philosopher_task(table.clone(), i, config.clone())))
        .collect::<Vec<_>>();

    for r in join_all(handles).await {
        r?;
    }

    Ok(table.snapshot())
}

use std::fmt;
use std::sync::{Condvar, Mutex};

use tracing::debug;

use crate::ring::{left, right};

/// 哲学者の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 考え中。箸は持っていない
    Idle,
    /// 空腹。両隣の箸を待っている
    Waiting,
    /// 食事中。両隣の箸を持っている
    Active,
}

impl Status {
    fn symbol(self) -> char {
        match self {
            Status::Idle => '.',
            Status::Waiting => 'H',
            Status::Active => 'E',
        }
    }
}

// Active な哲学者の両隣は Active ではない
// 箸の所有者は状態から一意に決まるので、箸ごとのフィールドは持たない
fn is_exclusive(status: &[Status]) -> bool {
    let n = status.len();
    (0..n).all(|i| {
        status[i] != Status::Active
            || (status[left(i, n)] != Status::Active && status[right(i, n)] != Status::Active)
    })
}

// ロックで保護される共有状態
// 読み書きはすべて Table (または AsyncTable) のロック獲得中に行う
#[derive(Debug)]
pub(crate) struct State {
    status: Vec<Status>,
    meals: Vec<u64>,
}

impl State {
    pub(crate) fn new(n: usize) -> Self {
        State {
            status: vec![Status::Idle; n],
            meals: vec![0; n],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.status.len()
    }

    pub(crate) fn status(&self, i: usize) -> Status {
        self.status[i]
    }

    pub(crate) fn hunger(&mut self, i: usize) {
        debug_assert_eq!(self.status[i], Status::Idle);
        self.status[i] = Status::Waiting;
    }

    // 待つのをやめる。Waiting は箸を持っていないので隣に影響しない
    pub(crate) fn give_up(&mut self, i: usize) {
        debug_assert_eq!(self.status[i], Status::Waiting);
        self.status[i] = Status::Idle;
    }

    pub(crate) fn put_down(&mut self, i: usize) {
        debug_assert_eq!(self.status[i], Status::Active);
        self.status[i] = Status::Idle;
    }

    /// 空腹で、両隣が食事中でなければ食事中にする
    /// 遷移した場合は true を返すので、呼び出し側が i を起こす
    pub(crate) fn admit(&mut self, i: usize) -> bool {
        let n = self.len();
        if self.status[i] == Status::Waiting
            && self.status[left(i, n)] != Status::Active
            && self.status[right(i, n)] != Status::Active
        {
            self.status[i] = Status::Active;
            self.meals[i] += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_exclusive(&self) -> bool {
        is_exclusive(&self.status)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status.clone(),
            meals: self.meals.clone(),
        }
    }
}

/// ある瞬間の卓の様子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: Vec<Status>,
    pub meals: Vec<u64>,
}

impl Snapshot {
    pub fn is_exclusive(&self) -> bool {
        is_exclusive(&self.status)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.status.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", s.symbol())?;
        }
        write!(f, "] meals={:?}", self.meals)
    }
}

/// スレッド用のモニタ
/// 状態全体を 1 つの Mutex で守り、哲学者ごとに条件変数を 1 つ持つ
/// 条件変数 signal[i] で待つのは哲学者 i だけ
pub struct Table {
    state: Mutex<State>,
    signal: Vec<Condvar>,
}

impl Table {
    /// # Panics
    ///
    /// n が 0 の場合
    pub fn new(n: usize) -> Self {
        assert!(n > 0);
        Table {
            state: Mutex::new(State::new(n)),
            signal: (0..n).map(|_| Condvar::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    // ロック獲得中に呼ぶこと
    fn test(&self, state: &mut State, i: usize) {
        if state.admit(i) {
            debug!(philosopher = i, "admitted");
            self.signal[i].notify_one();
        }
    }

    /// 両隣の箸を取る
    /// 戻った時点で status[i] == Active
    pub fn acquire(&self, i: usize) {
        let mut state = self.state.lock().unwrap();
        state.hunger(i);
        self.test(&mut state, i);

        // 無関係な起床もありうるので、毎回状態を確認する
        while state.status(i) != Status::Active {
            state = self.signal[i].wait(state).unwrap();
            debug!(philosopher = i, status = ?state.status(i), "woke up");
        }

        debug_assert!(state.is_exclusive());
    }

    /// 箸を置き、両隣が食事できるようになったか確認する
    pub fn release(&self, i: usize) {
        let mut state = self.state.lock().unwrap();
        state.put_down(i);

        let n = state.len();
        self.test(&mut state, left(i, n));
        self.test(&mut state, right(i, n));

        debug_assert!(state.is_exclusive());
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().snapshot()
    }
}

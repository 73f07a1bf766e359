use std::time::Duration;

/// Deferred session work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    AdvanceToReveal,
    RevealNext,
}

/// Handle shared by every job of one scheduled sequence. Cancelling it drops
/// all of that sequence's queued jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    token: CancelToken,
    job: Job,
}

/// Logical clock plus a queue of jobs due at points on it. Time only moves
/// when the owner calls [`Timeline::pop_due`].
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    now: Duration,
    next_token: u64,
    next_seq: u64,
    queue: Vec<Scheduled>,
}

impl Timeline {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn token(&mut self) -> CancelToken {
        self.next_token += 1;
        CancelToken(self.next_token)
    }

    pub fn schedule(&mut self, delay: Duration, token: CancelToken, job: Job) {
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: self.now + delay,
            seq: self.next_seq,
            token,
            job,
        });
    }

    pub fn cancel(&mut self, token: CancelToken) {
        self.queue.retain(|entry| entry.token != token);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_pending(&self, token: CancelToken) -> bool {
        self.queue.iter().any(|entry| entry.token == token)
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pops the earliest job due at or before `target`, moving the clock to its
    /// due time. When nothing is due the clock moves to `target` instead.
    pub fn pop_due(&mut self, target: Duration) -> Option<(CancelToken, Job)> {
        let next = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(idx, _)| idx);
        match next {
            Some(idx) => {
                let entry = self.queue.remove(idx);
                self.now = self.now.max(entry.due);
                Some((entry.token, entry.job))
            }
            None => {
                self.now = self.now.max(target);
                None
            }
        }
    }
}

use framefeed_frame::{FrameInfo, DEFAULT_QUEUE_CAPACITY};
use framefeed_session::{ConnectionStatus, Session, SessionStats};
use framefeed_source::{SourceConnector, StreamConfig};
use tracing::debug;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{ClientError, Result};
use crate::handle::ClientHandle;

/// Integer status reported for handles that resolve to no session.
pub const STATUS_UNKNOWN_HANDLE: i32 = -1;

/// Slot indexes must stay below this so the packed index+1 fits the
/// handle's low word.
const MAX_SLOTS: usize = u32::MAX as usize;

struct Slot {
    generation: u32,
    session: Option<Arc<Session>>,
}

struct Table {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

/// Owns every live session and maps opaque handles onto them.
///
/// Locking is two-level: the registry lock guards only the slot table
/// (insert, remove, lookup), while each session state sits behind the
/// session's own lock. Neither is ever held across a blocking operation.
/// Destroy removes the slot entry under the registry lock, then stops and
/// joins the worker outside it, so a slow join never stalls unrelated
/// create or poll traffic.
///
/// Lookups clone the session's `Arc` under the registry lock. A façade
/// call that obtained its clone just before a concurrent destroy finishes
/// against the stopping session; the memory goes away with the last clone.
pub struct ClientRegistry {
    table: Mutex<Table>,
    connector: Arc<dyn SourceConnector>,
    queue_capacity: usize,
}

impl ClientRegistry {
    /// Creates an empty registry whose sessions connect through
    /// `connector`.
    pub fn new(connector: Arc<dyn SourceConnector>) -> Self {
        Self {
            table: Mutex::new(Table {
                slots: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
            connector,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Overrides the per-session queue depth.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        // Poisoning is swallowed so one panicked caller cannot wedge the
        // whole registry.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, handle: ClientHandle) -> Option<Arc<Session>> {
        let table = self.table();
        let (index, generation) = handle.unpack()?;
        let slot = table.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.session.clone()
    }

    /// Creates a session and returns its handle.
    ///
    /// The worker thread spawns before the registry lock is taken; if
    /// construction fails nothing is inserted. A returned handle is unique
    /// among live sessions and never revives a destroyed handle's raw
    /// value.
    pub fn create(&self, config: StreamConfig) -> Result<ClientHandle> {
        let session = Arc::new(Session::spawn(
            config,
            Arc::clone(&self.connector),
            self.queue_capacity,
        )?);

        let mut table = self.table();
        let index = match table.free.pop() {
            Some(index) => index,
            None => {
                if table.slots.len() >= MAX_SLOTS {
                    drop(table);
                    // `session` drops here, which stops and joins its
                    // worker with no lock held.
                    return Err(ClientError::RegistryFull);
                }
                let index = table.slots.len() as u32;
                table.slots.push(Slot {
                    generation: 0,
                    session: None,
                });
                index
            }
        };
        let slot = &mut table.slots[index as usize];
        slot.session = Some(session);
        let handle = ClientHandle::pack(index, slot.generation);
        table.live += 1;
        debug!(handle = %handle, live = table.live, "session created");
        Ok(handle)
    }

    /// Destroys the session behind `handle`: the slot is reclaimed under
    /// the registry lock, then the worker is stopped and joined outside
    /// it. Stale and unknown handles are a no-op, so destroying twice is
    /// safe and destroy may race creates and polls of other handles.
    pub fn destroy(&self, handle: ClientHandle) {
        let session = {
            let mut table = self.table();
            let Some((index, generation)) = handle.unpack() else {
                return;
            };
            let Some(slot) = table.slots.get_mut(index as usize) else {
                return;
            };
            if slot.generation != generation {
                return;
            }
            let Some(session) = slot.session.take() else {
                return;
            };
            // Retire the raw handle value before the empty slot becomes
            // visible to anyone.
            slot.generation = slot.generation.wrapping_add(1);
            table.free.push(index);
            table.live -= 1;
            debug!(handle = %handle, live = table.live, "session destroyed");
            session
        };
        session.shutdown();
    }

    /// Destroys every live session: slots drain under the registry lock,
    /// then each worker is stopped and joined outside it. `Drop` calls
    /// this, so letting the registry go out of scope is a full teardown.
    pub fn destroy_all(&self) {
        let sessions = {
            let mut table = self.table();
            let Table { slots, free, live } = &mut *table;
            let mut sessions = Vec::with_capacity(*live);
            for (index, slot) in slots.iter_mut().enumerate() {
                if let Some(session) = slot.session.take() {
                    slot.generation = slot.generation.wrapping_add(1);
                    free.push(index as u32);
                    sessions.push(session);
                }
            }
            *live = 0;
            sessions
        };
        if !sessions.is_empty() {
            debug!(count = sessions.len(), "destroying all sessions");
        }
        for session in sessions {
            session.shutdown();
        }
    }

    /// Advances the session's current frame. False for unknown handles.
    pub fn update(&self, handle: ClientHandle) -> bool {
        self.lookup(handle).map(|s| s.update()).unwrap_or(false)
    }

    /// Dimensions of the handle's unread frame, if one is waiting.
    pub fn frame_info(&self, handle: ClientHandle) -> Option<FrameInfo> {
        self.lookup(handle)?.frame_info()
    }

    /// Copies the handle's unread frame into `buf`; see
    /// `Session::copy_frame_data` for the exact-copy-or-nothing contract.
    /// False for unknown handles.
    pub fn copy_frame_data(&self, handle: ClientHandle, buf: &mut [u8]) -> bool {
        self.lookup(handle)
            .map(|s| s.copy_frame_data(buf))
            .unwrap_or(false)
    }

    pub fn connection_status(&self, handle: ClientHandle) -> Option<ConnectionStatus> {
        self.lookup(handle).map(|s| s.status())
    }

    /// Integer status projection: [`STATUS_UNKNOWN_HANDLE`] when the
    /// handle resolves to nothing, otherwise the session's status code.
    pub fn status_code(&self, handle: ClientHandle) -> i32 {
        self.connection_status(handle)
            .map(ConnectionStatus::code)
            .unwrap_or(STATUS_UNKNOWN_HANDLE)
    }

    pub fn session_stats(&self, handle: ClientHandle) -> Option<SessionStats> {
        self.lookup(handle).map(|s| s.stats())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.table().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ClientRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefeed_source::{PatternConnector, PatternSpec};
    use std::collections::HashSet;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Polls `cond` until it holds or `timeout` elapses.
    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    fn fast_registry() -> ClientRegistry {
        ClientRegistry::new(Arc::new(PatternConnector::new(
            PatternSpec::default()
                .with_resolution(2, 2)
                .with_fps(1_000)
                .with_connect_delay(Duration::ZERO),
        )))
    }

    fn config() -> StreamConfig {
        StreamConfig::new("https://relay.example", "desktop")
    }

    /// xorshift64; deterministic interleaving shuffle without pulling in a
    /// dependency for four lines of arithmetic.
    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }
    }

    #[test]
    fn test_first_handle_from_fresh_registry_is_one() {
        let registry = fast_registry();
        let handle = registry.create(config()).expect("create should succeed");
        assert_eq!(handle.raw(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sequential_creates_yield_distinct_handles() {
        let registry = fast_registry();
        let a = registry.create(config()).expect("create should succeed");
        let b = registry.create(config()).expect("create should succeed");
        let c = registry.create(config()).expect("create should succeed");
        assert_eq!(
            [a.raw(), b.raw(), c.raw()],
            [1, 2, 3],
            "fresh slots are issued in order"
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_destroyed_handle_reports_not_found_everywhere() {
        let registry = fast_registry();
        let handle = registry.create(config()).expect("create should succeed");
        registry.destroy(handle);

        assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
        assert_eq!(registry.connection_status(handle), None);
        assert!(!registry.update(handle));
        assert_eq!(registry.frame_info(handle), None);
        let mut buf = [0u8; 16];
        assert!(!registry.copy_frame_data(handle, &mut buf));
        assert_eq!(registry.session_stats(handle), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_slot_reuse_never_revives_a_stale_handle() {
        let registry = fast_registry();
        let first = registry.create(config()).expect("create should succeed");
        registry.destroy(first);

        let second = registry.create(config()).expect("create should succeed");
        // Same slot, new generation: raw values must differ.
        assert_ne!(second.raw(), first.raw());
        assert_eq!(second.raw(), (1 << 32) | 1);

        assert_eq!(
            registry.status_code(first),
            STATUS_UNKNOWN_HANDLE,
            "the stale handle must not reach the successor session"
        );
        assert_ne!(registry.status_code(second), STATUS_UNKNOWN_HANDLE);
    }

    #[test]
    fn test_destroy_is_idempotent_and_tolerates_garbage() {
        let registry = fast_registry();
        let handle = registry.create(config()).expect("create should succeed");
        registry.destroy(handle);
        registry.destroy(handle);
        registry.destroy(ClientHandle::INVALID);
        registry.destroy(ClientHandle::from_raw(u64::MAX));
        registry.destroy(ClientHandle::from_raw(999));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_destroy_all_empties_the_registry() {
        let registry = fast_registry();
        let handles: Vec<ClientHandle> = (0..3)
            .map(|_| registry.create(config()).expect("create should succeed"))
            .collect();
        registry.destroy_all();
        assert_eq!(registry.len(), 0);
        for handle in handles {
            assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
        }
    }

    #[test]
    fn test_end_to_end_poll_cycle() {
        let registry = ClientRegistry::new(Arc::new(PatternConnector::new(
            PatternSpec::default().with_connect_delay(Duration::from_millis(10)),
        )));
        let handle = registry
            .create(config().with_target_latency(Duration::from_millis(500)))
            .expect("create should succeed");
        assert_eq!(handle.raw(), 1);

        // The status projection may only move forward: 0 -> 1 -> 2.
        let mut observed = Vec::new();
        assert!(
            wait_until(Duration::from_secs(5), || {
                observed.push(registry.status_code(handle));
                observed.last() == Some(&2)
            }),
            "session should reach connected, saw {observed:?}"
        );
        assert!(
            observed.windows(2).all(|w| w[0] <= w[1]),
            "status must be monotonic, saw {observed:?}"
        );

        assert!(
            wait_until(Duration::from_secs(5), || {
                registry.update(handle);
                registry.frame_info(handle).is_some()
            }),
            "a frame should arrive"
        );
        let info = registry.frame_info(handle).expect("frame should be advertised");
        assert_eq!((info.width, info.height), (640, 480));

        let mut buf = vec![0u8; 640 * 480 * 4];
        assert!(registry.copy_frame_data(handle, &mut buf));
        assert!(
            !registry.copy_frame_data(handle, &mut buf),
            "one update, one copy"
        );

        registry.destroy(handle);
        assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
        assert!(!registry.update(handle));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_creates_yield_unique_handles() {
        let registry = Arc::new(fast_registry());
        let mut workers = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            workers.push(thread::spawn(move || {
                (0..25)
                    .map(|_| {
                        registry
                            .create(config())
                            .expect("create should succeed")
                            .raw()
                    })
                    .collect::<Vec<u64>>()
            }));
        }

        let mut raws = HashSet::new();
        for worker in workers {
            for raw in worker.join().expect("creator thread should finish") {
                assert!(raws.insert(raw), "handle {raw} issued twice");
            }
        }
        assert_eq!(raws.len(), 200);
        assert_eq!(registry.len(), 200);
        registry.destroy_all();
    }

    #[test]
    fn test_poll_racing_destroy_settles_on_not_found() {
        let registry = Arc::new(fast_registry());
        let handle = registry.create(config()).expect("create should succeed");

        let poller = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                // Hammer the façade until the handle disappears; the flip
                // must be permanent.
                for _ in 0..50_000_000_u64 {
                    let code = registry.status_code(handle);
                    registry.update(handle);
                    if code == STATUS_UNKNOWN_HANDLE {
                        assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
                        return true;
                    }
                }
                false
            })
        };

        thread::sleep(Duration::from_millis(20));
        registry.destroy(handle);
        assert!(
            poller.join().expect("poller thread should finish"),
            "poller never observed the destroy"
        );
    }

    #[test]
    fn test_randomized_create_destroy_poll_interleavings() {
        let registry = Arc::new(fast_registry());
        let threads = 4;
        let iterations = 2_500u64;

        let mut workers = Vec::new();
        for t in 0..threads {
            let registry = Arc::clone(&registry);
            let seed = 0x9E37_79B9_7F4A_7C15_u64.wrapping_mul(t as u64 + 1);
            workers.push(thread::spawn(move || {
                let mut rng = XorShift(seed | 1);
                let mut live: Vec<ClientHandle> = Vec::new();
                let mut retired: Vec<ClientHandle> = Vec::new();
                let mut buf = vec![0u8; 2 * 2 * 4];

                for _ in 0..iterations {
                    match rng.next() % 5 {
                        0 => {
                            live.push(registry.create(config()).expect("create should succeed"));
                        }
                        1 => {
                            if !live.is_empty() {
                                let handle = live.swap_remove((rng.next() as usize) % live.len());
                                registry.destroy(handle);
                                assert_eq!(
                                    registry.status_code(handle),
                                    STATUS_UNKNOWN_HANDLE,
                                    "destroyed handle must be gone immediately"
                                );
                                retired.push(handle);
                            }
                        }
                        2 => {
                            if !live.is_empty() {
                                let handle = live[(rng.next() as usize) % live.len()];
                                registry.update(handle);
                                registry.copy_frame_data(handle, &mut buf);
                            }
                        }
                        3 => {
                            if !live.is_empty() {
                                let handle = live[(rng.next() as usize) % live.len()];
                                let code = registry.status_code(handle);
                                assert!(
                                    (0..=2).contains(&code),
                                    "live pattern session reported {code}"
                                );
                            }
                        }
                        _ => {
                            if !retired.is_empty() {
                                let handle = retired[(rng.next() as usize) % retired.len()];
                                assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
                                assert!(!registry.update(handle));
                            }
                        }
                    }
                }

                for handle in live {
                    registry.destroy(handle);
                    retired.push(handle);
                }
                retired
            }));
        }

        let mut all_retired = Vec::new();
        for worker in workers {
            all_retired.extend(worker.join().expect("interleaving thread should finish"));
        }
        assert_eq!(registry.len(), 0);
        for handle in all_retired {
            assert_eq!(registry.status_code(handle), STATUS_UNKNOWN_HANDLE);
        }
    }
}

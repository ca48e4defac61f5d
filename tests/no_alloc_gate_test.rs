use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use blockfall::core::{GameSnapshot, GameState};
use blockfall::engine::reducer;
use blockfall::types::GameAction;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn core_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut gs = GameState::new(1);
    let mut snap = GameSnapshot::default();

    // Warm-up.
    let _ = gs.tick(16);
    let _ = gs.apply_action(GameAction::MoveLeft);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            let _ = gs.tick(16);
        }

        for _ in 0..50 {
            let _ = gs.apply_action(GameAction::MoveLeft);
            let _ = gs.apply_action(GameAction::MoveRight);
            let _ = gs.apply_action(GameAction::RotateCw);
            let _ = gs.apply_action(GameAction::RotateCcw);
            let _ = gs.apply_action(GameAction::Rotate180);
            let _ = gs.apply_action(GameAction::SoftDrop);
        }

        // Hard drop drives lock, line clear, scoring and spawning.
        for _ in 0..60 {
            let _ = gs.apply_action(GameAction::Hold);
            let _ = gs.apply_action(GameAction::HardDrop);
            let _ = gs.tick(1000);
            let _ = gs.take_last_event();
            gs.snapshot_into(&mut snap);
            if gs.is_game_over() {
                gs.restart();
            }
        }
    });

    assert!(allocs == 0);

    // The pure reducers copy the state; the copy must stay on the stack.
    let mut gs = reducer::reset(Default::default()).unwrap();
    let frame = [GameAction::MoveRight, GameAction::RotateCw, GameAction::HardDrop];

    let allocs = with_alloc_counting(|| {
        for _ in 0..100 {
            gs = match reducer::step(&gs, &frame, 16) {
                Ok(next) => next,
                Err(_) => break,
            };
            if gs.is_game_over() {
                gs.restart();
            }
        }
    });

    assert!(allocs == 0);
}

//! Headless Glass Demo
//!
//! Drives a glass binding on a simulated element through a resize and a
//! hover/press cycle, printing every style write.
//!
//! Run with: RUST_LOG=debug cargo run -p glassheart_app --example headless_demo

use glassheart_app::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone)]
struct Element {
    name: &'static str,
    size: Rc<Cell<(f32, f32)>>,
    writes: Rc<RefCell<usize>>,
}

impl ElementHost for Element {
    fn layout_box(&self) -> Option<LayoutBox> {
        let (width, height) = self.size.get();
        Some(LayoutBox::new(width, height))
    }

    fn border_radius(&self) -> String {
        "16px".to_string()
    }

    fn apply_backdrop_filter(&self, value: &str) {
        *self.writes.borrow_mut() += 1;
        let shown: String = value.chars().take(72).collect();
        println!("[{}] backdrop-filter ({} bytes): {}...", self.name, value.len(), shown);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ctx = GlassContext::new(GlassConfig::default());
    let card = Element {
        name: "card",
        size: Rc::new(Cell::new((320.0, 180.0))),
        writes: Rc::new(RefCell::new(0)),
    };

    let glass = ctx.bind(card.clone(), GlassOptions::new().chromatic_aberration(4.0));
    ctx.run_frame();

    card.size.set((360.0, 180.0));
    glass.notify_resize(ResizeTrigger::Window);
    ctx.run_frame();

    glass.pointer_enter();
    ctx.advance_by(Duration::from_millis(16));
    glass.pointer_down();
    glass.pointer_up();
    glass.pointer_leave();

    let stats = ctx.cache_stats();
    println!(
        "{} writes, cache: {} entries, {} hits, {} misses",
        card.writes.borrow(),
        stats.len,
        stats.hits,
        stats.misses
    );

    Ok(())
}

//! Property-style invariants for narrow-layout derivation.
//!
//! This suite throws random wide arrangements at `derive_narrow` and
//! asserts the stack invariants: gapless coverage from row zero, no
//! overlaps, full narrow width, idempotence, and input-order
//! independence.

use dashgrid_core::{GridRect, GridSpec, StaticCatalog, Widget, WidgetId};
use dashgrid_layout::{DerivedPlacement, derive_narrow};
use proptest::prelude::*;

fn grid() -> GridSpec {
    GridSpec::DEFAULT
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
}

/// Random widget sets whose wide rects all fit the 24-column grid.
fn arb_widget_set() -> impl Strategy<Value = Vec<Widget>> {
    prop::collection::vec((0u16..24, 0u16..40, 1u16..=24, 1u16..12), 0..20).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| {
                let w = w.min(24 - x).max(1);
                Widget::new(WidgetId(i as u64 + 1), "clock")
                    .with_wide(GridRect::new(x, y, w, h))
            })
            .collect()
    })
}

fn assert_stack_invariants(derived: &[DerivedPlacement]) {
    if let Some(first) = derived.first() {
        assert_eq!(first.rect.y, 0, "stack must start at row zero");
    }
    for pair in derived.windows(2) {
        assert_eq!(
            pair[0].rect.y_end(),
            u32::from(pair[1].rect.y),
            "stack must be gapless and overlap-free"
        );
    }
    for placement in derived {
        assert_eq!(placement.rect.x, 0);
        assert_eq!(placement.rect.w, 4, "every slot spans the narrow grid");
        assert!(placement.rect.h >= 1);
    }
}

proptest! {
    #[test]
    fn derived_stack_is_gapless(widgets in arb_widget_set()) {
        let derived = derive_narrow(&widgets, &grid(), &catalog());
        prop_assert_eq!(derived.len(), widgets.len());
        assert_stack_invariants(&derived);
    }

    #[test]
    fn derivation_is_idempotent(widgets in arb_widget_set()) {
        let first = derive_narrow(&widgets, &grid(), &catalog());
        let second = derive_narrow(&widgets, &grid(), &catalog());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn input_order_never_matters(widgets in arb_widget_set(), seed in any::<u64>()) {
        let mut shuffled = widgets.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let a = derive_narrow(&widgets, &grid(), &catalog());
        let b = derive_narrow(&shuffled, &grid(), &catalog());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn heights_never_shrink(widgets in arb_widget_set()) {
        let derived = derive_narrow(&widgets, &grid(), &catalog());
        for placement in &derived {
            let source = widgets
                .iter()
                .find(|w| w.id == placement.id)
                .and_then(|w| w.wide)
                .expect("derived placements come from wide rects");
            prop_assert!(placement.rect.h >= source.h);
        }
    }
}

#[test]
fn widgets_missing_wide_rects_never_panic_the_batch() {
    let widgets = vec![
        Widget::new(WidgetId(1), "clock"),
        Widget::new(WidgetId(2), "clock").with_wide(GridRect::new(0, 0, 6, 4)),
        Widget::new(WidgetId(3), "clock"),
    ];
    let derived = derive_narrow(&widgets, &grid(), &catalog());
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].id, WidgetId(2));
}

//! Alphabetical ordering inside grouped sections
//!
//! Takes a sequence produced by [`crate::grouping::group_by_creator`] (or built
//! by hand) and sorts each run of items that follows a section marker. Markers
//! stay where they are; items that appear before the first marker belong to no
//! section and are passed through in place.

use crate::collation::collation_key;
use crate::grouping::{group_by_creator, GroupConfig, Grouped};

/// Sort the items inside each section by label.
///
/// Labels are compared by base letter (case and diacritics ignored). The sort
/// is stable, so items with equal labels keep their input order and repeated
/// calls return identical output. The input is left untouched; markers are
/// shared with the output rather than rebuilt.
///
/// ```
/// use yoga_common::grouping::{Grouped, SectionMarker};
/// use yoga_common::ordering::order_in_groups;
///
/// let input = vec![
///     Grouped::Section(SectionMarker::new("Mine")),
///     Grouped::Item("Zebra"),
///     Grouped::Item("Apple"),
/// ];
/// let ordered = order_in_groups(&input, |name| *name);
/// assert_eq!(
///     ordered,
///     vec![
///         Grouped::Section(SectionMarker::new("Mine")),
///         Grouped::Item("Apple"),
///         Grouped::Item("Zebra"),
///     ]
/// );
/// ```
pub fn order_in_groups<T, F>(input: &[Grouped<T>], get_label: F) -> Vec<Grouped<T>>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut out = Vec::with_capacity(input.len());
    let mut run: Vec<&T> = Vec::new();
    let mut in_section = false;

    for entry in input {
        match entry {
            Grouped::Section(marker) => {
                flush_sorted(&mut out, &mut run, &get_label);
                in_section = true;
                out.push(Grouped::Section(marker.clone()));
            }
            Grouped::Item(item) if in_section => run.push(item),
            Grouped::Item(item) => out.push(Grouped::Item(item.clone())),
        }
    }
    flush_sorted(&mut out, &mut run, &get_label);

    out
}

fn flush_sorted<'a, T, F>(out: &mut Vec<Grouped<T>>, run: &mut Vec<&'a T>, get_label: &F)
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    if run.is_empty() {
        return;
    }

    let mut keyed: Vec<(String, &T)> = run
        .drain(..)
        .map(|item| (collation_key(get_label(item)), item))
        .collect();
    // sort_by is stable: equal keys keep input order
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    out.extend(keyed.into_iter().map(|(_, item)| Grouped::Item(item.clone())));
}

/// Group by creator, then order each section by label.
///
/// This is the composition every search list performs before rendering.
pub fn group_and_order<'a, T, I, C, L>(
    items: I,
    config: &GroupConfig,
    get_created_by: C,
    get_label: L,
) -> Vec<Grouped<&'a T>>
where
    I: IntoIterator<Item = &'a T>,
    C: Fn(&T) -> Option<&str>,
    L: Fn(&T) -> &str,
{
    let grouped = group_by_creator(items, config, get_created_by);
    order_in_groups(&grouped, |item| get_label(*item))
}

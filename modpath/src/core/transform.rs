//! Path-list editing: a removal pass followed by an insertion pass.
//!
//! Removal runs in every mode so that adding an entry never leaves an older
//! copy of it elsewhere in the list. Insertion runs only for the add modes.

use crate::core::command::{Command, Mode};
use crate::core::path_list::PathList;

/// Apply `command` to `list` and return the edited list.
pub fn apply_command(mut list: PathList, command: &Command) -> PathList {
    remove_matching(&mut list, &command.entries, command.mode.is_inexact());
    insert_entries(&mut list, &command.entries, command.mode);
    list
}

/// Drop every segment matching any of `entries`.
///
/// Exact matching compares whole segments case-insensitively; inexact
/// matching drops segments that contain the entry as a case-insensitive
/// substring. Surviving segments keep their order.
pub fn remove_matching(list: &mut PathList, entries: &[String], inexact: bool) {
    let needles: Vec<String> = entries.iter().map(|entry| entry.to_lowercase()).collect();
    list.retain(|segment| {
        let segment = segment.to_lowercase();
        !needles.iter().any(|needle| {
            if inexact {
                segment.contains(needle.as_str())
            } else {
                segment == *needle
            }
        })
    });
}

/// Insert `entries` according to `mode`; removal-only modes are a no-op.
pub fn insert_entries(list: &mut PathList, entries: &[String], mode: Mode) {
    match mode {
        Mode::AddFront => list.prepend(entries),
        Mode::AddEnd => list.append(entries),
        Mode::Remove | Mode::RemoveAny => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::command;

    fn list(raw: &str) -> PathList {
        PathList::split(raw, ';')
    }

    #[test]
    fn add_front_keeps_entry_order() {
        let out = apply_command(list("x"), &command(Mode::AddFront, &["a", "b"]));
        assert_eq!(out.segments(), ["a", "b", "x"]);
    }

    #[test]
    fn add_end_appends_in_order() {
        let out = apply_command(list("x"), &command(Mode::AddEnd, &["a", "b"]));
        assert_eq!(out.segments(), ["x", "a", "b"]);
    }

    #[test]
    fn add_front_moves_existing_entry_to_front() {
        let out = apply_command(list("A;B;C"), &command(Mode::AddFront, &["c"]));
        assert_eq!(out.join(';'), "c;A;B");
    }

    #[test]
    fn add_front_end_to_end() {
        let out = apply_command(list("A;B;C"), &command(Mode::AddFront, &["D", "E"]));
        assert_eq!(out.join(';'), "D;E;A;B;C");
    }

    #[test]
    fn repeated_add_is_idempotent() {
        let cmd = command(Mode::AddFront, &["D", "E"]);
        let once = apply_command(list("A;d;B;e;C"), &cmd);
        let twice = apply_command(once.clone(), &cmd);
        assert_eq!(once.join(';'), "D;E;A;B;C");
        assert_eq!(twice, once);
    }

    #[test]
    fn removing_after_insert_leaves_no_entry_behind() {
        let entries = ["D".to_string(), "a".to_string()];
        let mut out = list("A;B;d;C");
        insert_entries(&mut out, &entries, Mode::AddFront);
        remove_matching(&mut out, &entries, false);
        assert_eq!(out.join(';'), "B;C");
    }

    #[test]
    fn existing_entry_in_add_list_is_moved_with_the_others() {
        let out = apply_command(list("A;B;C"), &command(Mode::AddFront, &["B", "D", "E"]));
        assert_eq!(out.join(';'), "B;D;E;A;C");
    }

    #[test]
    fn remove_any_drops_substring_matches() {
        let out = apply_command(
            list("C:\\Foo\\bin;D:\\other"),
            &command(Mode::RemoveAny, &["foo"]),
        );
        assert_eq!(out.segments(), ["D:\\other"]);
    }

    #[test]
    fn remove_is_exact() {
        let out = apply_command(
            list("C:\\Foo;C:\\Foobar"),
            &command(Mode::Remove, &["C:\\foo"]),
        );
        assert_eq!(out.segments(), ["C:\\Foobar"]);
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let out = apply_command(list("a;b;A;c;a"), &command(Mode::Remove, &["a"]));
        assert_eq!(out.segments(), ["b", "c"]);
    }

    #[test]
    fn unmatched_entries_are_ignored() {
        let out = apply_command(list("a;b"), &command(Mode::Remove, &["zzz"]));
        assert_eq!(out.segments(), ["a", "b"]);
    }

    #[test]
    fn entries_are_not_deduplicated_among_themselves() {
        let out = apply_command(list("x"), &command(Mode::AddEnd, &["a", "a"]));
        assert_eq!(out.segments(), ["x", "a", "a"]);
    }

    #[test]
    fn empty_entry_removes_empty_segments_exactly() {
        let out = apply_command(list("a;;b"), &command(Mode::Remove, &[""]));
        assert_eq!(out.segments(), ["a", "b"]);
    }

    #[test]
    fn empty_entry_matches_everything_inexactly() {
        let out = apply_command(list("a;b"), &command(Mode::RemoveAny, &[""]));
        assert!(out.is_empty());
    }

    #[test]
    fn add_to_empty_list() {
        let out = apply_command(PathList::default(), &command(Mode::AddFront, &["a"]));
        assert_eq!(out.join(';'), "a");
    }

    #[test]
    fn add_to_empty_value_keeps_its_empty_segment() {
        let out = apply_command(list(""), &command(Mode::AddFront, &["a"]));
        assert_eq!(out.join(';'), "a;");
    }

    #[test]
    fn end_to_end_after_remove_any() {
        let out = apply_command(list("A;B;C"), &command(Mode::RemoveAny, &["B"]));
        assert_eq!(out.join(';'), "A;C");
        let out = apply_command(out, &command(Mode::AddFront, &["D", "E"]));
        assert_eq!(out.join(';'), "D;E;A;C");
    }

    #[test]
    fn comparison_folds_non_ascii_case() {
        let out = apply_command(list("C:\\Überall;x"), &command(Mode::Remove, &["c:\\überall"]));
        assert_eq!(out.segments(), ["x"]);
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::create_test_persistence;

#[test]
fn test_missing_setting_is_none() {
    let mut persistence = create_test_persistence();
    assert_eq!(persistence.get_setting("static_role_contexts").unwrap(), None);
}

#[test]
fn test_set_and_get_setting() {
    let mut persistence = create_test_persistence();

    persistence.set_setting("static_role_contexts", "61\n84").unwrap();
    assert_eq!(
        persistence.get_setting("static_role_contexts").unwrap(),
        Some("61\n84".to_string())
    );
}

#[test]
fn test_set_setting_replaces_value() {
    let mut persistence = create_test_persistence();

    persistence.set_setting("static_role_contexts", "61").unwrap();
    persistence.set_setting("static_role_contexts", "84").unwrap();

    assert_eq!(
        persistence.get_setting("static_role_contexts").unwrap(),
        Some("84".to_string())
    );
}

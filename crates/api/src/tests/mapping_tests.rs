// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping cache and mapping management tests.

use crate::ApiError;
use crate::tests::{create_pupil, create_test_persistence, saved_record};
use guardian_sync_domain::Adno;

#[test]
fn test_add_mapping_by_adno() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    let pupil_id = create_pupil(&mut persistence, "A1001");

    let adno = Adno::new("a1001").unwrap();
    let mapping_id = record.add_mapping_by_adno(&mut persistence, &adno).unwrap();
    assert!(mapping_id > 0);

    let mappings = record.contact_mappings(&mut persistence, false).unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].adno, "A1001");
    assert_eq!(mappings[0].pupil.moodle_user_id, pupil_id);
}

#[test]
fn test_add_mapping_unknown_adno_fails() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");

    let adno = Adno::new("A9999").unwrap();
    let result = record.add_mapping_by_adno(&mut persistence, &adno);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_remove_mapping_by_adno() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    create_pupil(&mut persistence, "A1001");

    let adno = Adno::new("A1001").unwrap();
    record.add_mapping_by_adno(&mut persistence, &adno).unwrap();
    record
        .remove_mapping_by_adno(&mut persistence, &adno)
        .unwrap();

    assert!(
        record
            .contact_mappings(&mut persistence, false)
            .unwrap()
            .is_empty()
    );

    // Removing again: nothing left to remove
    let result = record.remove_mapping_by_adno(&mut persistence, &adno);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_mapping_cache_serves_stale_reads_until_forced() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    let contact_id = record.contact().contact_id.unwrap();
    create_pupil(&mut persistence, "A1001");
    let pupil_b = create_pupil(&mut persistence, "A1002");

    let adno = Adno::new("A1001").unwrap();
    record.add_mapping_by_adno(&mut persistence, &adno).unwrap();

    // Prime the cache
    assert_eq!(
        record.contact_mappings(&mut persistence, false).unwrap().len(),
        1
    );

    // Add a mapping behind the cache's back
    persistence
        .insert_contact_mapping(contact_id, "A1002", pupil_b)
        .unwrap();

    // Unforced read serves the cache and misses the new row
    assert_eq!(
        record.contact_mappings(&mut persistence, false).unwrap().len(),
        1
    );

    // Forced reload re-queries
    assert_eq!(
        record.contact_mappings(&mut persistence, true).unwrap().len(),
        2
    );
}

#[test]
fn test_mapping_mutations_invalidate_cache() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    create_pupil(&mut persistence, "A1001");
    create_pupil(&mut persistence, "A1002");

    let first = Adno::new("A1001").unwrap();
    let second = Adno::new("A1002").unwrap();

    record.add_mapping_by_adno(&mut persistence, &first).unwrap();
    assert_eq!(
        record.contact_mappings(&mut persistence, false).unwrap().len(),
        1
    );

    // add/remove go through the record, so an unforced read stays fresh
    record.add_mapping_by_adno(&mut persistence, &second).unwrap();
    assert_eq!(
        record.contact_mappings(&mut persistence, false).unwrap().len(),
        2
    );

    record
        .remove_mapping_by_adno(&mut persistence, &first)
        .unwrap();
    assert_eq!(
        record.contact_mappings(&mut persistence, false).unwrap().len(),
        1
    );
}

#[test]
fn test_mapping_with_missing_pupil_is_skipped() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    let contact_id = record.contact().contact_id.unwrap();
    create_pupil(&mut persistence, "A1001");
    let doomed = create_pupil(&mut persistence, "A1002");

    record
        .add_mapping_by_adno(&mut persistence, &Adno::new("A1001").unwrap())
        .unwrap();
    persistence
        .insert_contact_mapping(contact_id, "A1002", doomed)
        .unwrap();

    // The pupil behind the second mapping disappears from the projection
    persistence.delete_moodle_user(doomed).unwrap();

    // Skipped, not an error: only the resolvable mapping comes back
    let mappings = record.contact_mappings(&mut persistence, true).unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].adno, "A1001");
}

#[test]
fn test_delete_refuses_while_mappings_exist() {
    let mut persistence = create_test_persistence();
    let mut record = saved_record(&mut persistence, 1, "GUID-1", "alex.bloom@example.org");
    let contact_id = record.contact().contact_id.unwrap();
    create_pupil(&mut persistence, "A1001");

    record
        .add_mapping_by_adno(&mut persistence, &Adno::new("A1001").unwrap())
        .unwrap();

    let result = record.delete(&mut persistence);
    assert_eq!(
        result,
        Err(ApiError::MappingsStillPresent {
            contact_id,
            count: 1
        })
    );
    assert!(persistence.get_contact_by_id(contact_id).unwrap().is_some());

    // Unmapping clears the way
    record
        .remove_mapping_by_adno(&mut persistence, &Adno::new("A1001").unwrap())
        .unwrap();
    record.delete(&mut persistence).unwrap();
}

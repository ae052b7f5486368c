//! Integration tests for `SqliteStore` against an in-memory database.

use serde_json::json;
use taxon_core::{
  bulk::{BulkDomainConcept, BulkSave, BulkSubjectArea},
  concept::{ConceptType, DomainConceptPatch, NewDomainConcept},
  reference::{
    DataFilter, NewReference, NewReferenceData, NewReferenceField, Payload,
    ReferenceDataPatch, ReferenceFieldPatch, ReferencePatch,
  },
  store::CatalogStore,
  subject_area::{NewSubjectArea, SubjectAreaPatch},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn payload(value: serde_json::Value) -> Payload {
  serde_json::from_value(value).unwrap()
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
  ids.sort();
  ids
}

// ─── Subject areas ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_subject_area_assigns_id_and_defaults() {
  let s = store().await;

  let a = s.create_subject_area(NewSubjectArea::new("fin", "Finance")).await.unwrap();
  assert!(!a.area.id.is_empty());
  assert!(a.area.parent_id.is_none());
  assert_eq!(a.area.sort_order, 0);
  assert!(a.is_terminal);

  let b = s.create_subject_area(NewSubjectArea::new("fin", "Finance")).await.unwrap();
  assert_ne!(a.area.id, b.area.id, "duplicate codes are allowed");
}

#[tokio::test]
async fn list_subject_areas_orders_and_flags_leaves() {
  let s = store().await;

  let mut root = NewSubjectArea::new("root", "Root");
  root.sort_order = 2;
  let root = s.create_subject_area(root).await.unwrap();

  let mut child = NewSubjectArea::new("child", "Child").under(&root.area.id);
  child.sort_order = 1;
  let child = s.create_subject_area(child).await.unwrap();

  let all = s.list_subject_areas().await.unwrap();
  let ids: Vec<&str> = all.iter().map(|n| n.area.id.as_str()).collect();
  assert_eq!(ids, vec![child.area.id.as_str(), root.area.id.as_str()]);

  let root_node = all.iter().find(|n| n.area.id == root.area.id).unwrap();
  let child_node = all.iter().find(|n| n.area.id == child.area.id).unwrap();
  assert!(!root_node.is_terminal);
  assert!(child_node.is_terminal);
}

#[tokio::test]
async fn partial_update_keeps_omitted_fields() {
  let s = store().await;
  let parent = s.create_subject_area(NewSubjectArea::new("p", "Parent")).await.unwrap();
  let mut input = NewSubjectArea::new("c", "Child").under(&parent.area.id);
  input.sort_order = 5;
  let child = s.create_subject_area(input).await.unwrap();

  let patch = SubjectAreaPatch { name: Some("Renamed".into()), ..Default::default() };
  let updated = s
    .update_subject_area(child.area.id.clone(), patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.area.name, "Renamed");
  assert_eq!(updated.area.code, "c");
  assert_eq!(updated.area.parent_id.as_deref(), Some(parent.area.id.as_str()));
  assert_eq!(updated.area.sort_order, 5);
  assert_eq!(updated.area.created_at, child.area.created_at);
  assert!(updated.area.updated_at >= child.area.updated_at);
  assert!(updated.is_terminal);
}

#[tokio::test]
async fn update_recomputes_is_terminal() {
  let s = store().await;
  let parent = s.create_subject_area(NewSubjectArea::new("p", "Parent")).await.unwrap();
  s.create_subject_area(NewSubjectArea::new("c", "Child").under(&parent.area.id))
    .await
    .unwrap();

  let updated = s
    .update_subject_area(parent.area.id.clone(), SubjectAreaPatch::default())
    .await
    .unwrap()
    .unwrap();
  assert!(!updated.is_terminal);
}

#[tokio::test]
async fn update_missing_subject_area_returns_none() {
  let s = store().await;
  let result = s
    .update_subject_area("nope".into(), SubjectAreaPatch::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Cascading deletes ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_subject_area_removes_subtree_and_member_concepts() {
  let s = store().await;
  let a = s.create_subject_area(NewSubjectArea::new("a", "A")).await.unwrap().area;
  let b = s
    .create_subject_area(NewSubjectArea::new("b", "B").under(&a.id))
    .await
    .unwrap()
    .area;
  let c = s
    .create_subject_area(NewSubjectArea::new("c", "C").under(&b.id))
    .await
    .unwrap()
    .area;
  let other = s.create_subject_area(NewSubjectArea::new("o", "Other")).await.unwrap().area;

  let in_a = s.create_domain_concept(NewDomainConcept::new(&a.id, "x", "X")).await.unwrap();
  let in_c = s.create_domain_concept(NewDomainConcept::new(&c.id, "y", "Y")).await.unwrap();
  // Concept under a concept of another area, but itself a member of `b`.
  let foreign_root = s
    .create_domain_concept(NewDomainConcept::new(&other.id, "r", "R"))
    .await
    .unwrap();
  let in_b = s
    .create_domain_concept(NewDomainConcept::new(&b.id, "z", "Z").under(&foreign_root.id))
    .await
    .unwrap();

  let report = s.delete_subject_area(a.id.clone()).await.unwrap().unwrap();
  assert_eq!(report.subject_areas[0], a.id);
  assert_eq!(
    sorted(report.subject_areas.clone()),
    sorted(vec![a.id.clone(), b.id.clone(), c.id.clone()])
  );
  assert_eq!(
    sorted(report.domain_concepts.clone()),
    sorted(vec![in_a.id, in_b.id, in_c.id])
  );

  let areas = s.list_subject_areas().await.unwrap();
  assert_eq!(areas.len(), 1);
  assert_eq!(areas[0].area.id, other.id);

  let concepts = s.list_domain_concepts(None).await.unwrap();
  assert_eq!(concepts.len(), 1);
  assert_eq!(concepts[0].id, foreign_root.id);
}

#[tokio::test]
async fn delete_missing_subject_area_returns_none() {
  let s = store().await;
  assert!(s.delete_subject_area("nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_domain_concept_stays_in_concept_tree() {
  let s = store().await;
  let a = s.create_subject_area(NewSubjectArea::new("a", "A")).await.unwrap().area;
  let other = s.create_subject_area(NewSubjectArea::new("o", "O")).await.unwrap().area;

  let mut list = NewDomainConcept::new(&a.id, "addr", "Addresses");
  list.concept_type = ConceptType::List;
  let list = s.create_domain_concept(list).await.unwrap();
  let street = s
    .create_domain_concept(NewDomainConcept::new(&a.id, "street", "Street").under(&list.id))
    .await
    .unwrap();
  let house = s
    .create_domain_concept(NewDomainConcept::new(&a.id, "house", "House").under(&street.id))
    .await
    .unwrap();
  let sibling = s
    .create_domain_concept(NewDomainConcept::new(&a.id, "inn", "INN"))
    .await
    .unwrap();
  let elsewhere = s
    .create_domain_concept(NewDomainConcept::new(&other.id, "inn", "INN"))
    .await
    .unwrap();

  let report = s.delete_domain_concept(list.id.clone()).await.unwrap().unwrap();
  assert!(report.subject_areas.is_empty());
  assert_eq!(
    sorted(report.domain_concepts),
    sorted(vec![list.id, street.id, house.id])
  );

  let left: Vec<String> = s
    .list_domain_concepts(None)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(sorted(left), sorted(vec![sibling.id, elsewhere.id]));
  assert_eq!(s.list_subject_areas().await.unwrap().len(), 2);
}

#[tokio::test]
async fn cyclic_tree_delete_fails_and_rolls_back() {
  let s = store().await;
  let batch: BulkSave = serde_json::from_value(json!({
    "subject_areas": [
      { "id": "a", "code": "a", "name": "A", "parent_id": "b" },
      { "id": "b", "code": "b", "name": "B", "parent_id": "a" },
    ],
    "domain_concepts": [
      { "id": "c", "code": "c", "name": "C", "subject_area_id": "a" },
    ],
  }))
  .unwrap();
  s.bulk_save(batch).await.unwrap();

  let err = s.delete_subject_area("a".into()).await.unwrap_err();
  assert!(
    matches!(err, Error::Core(taxon_core::Error::CycleDetected(_))),
    "unexpected error: {err}"
  );

  assert_eq!(s.list_subject_areas().await.unwrap().len(), 2);
  assert_eq!(s.list_domain_concepts(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cyclic_concept_tree_delete_fails_and_rolls_back() {
  let s = store().await;
  let batch: BulkSave = serde_json::from_value(json!({
    "domain_concepts": [
      { "id": "x", "code": "x", "name": "X", "subject_area_id": "a", "parent_id": "y" },
      { "id": "y", "code": "y", "name": "Y", "subject_area_id": "a", "parent_id": "x" },
      { "id": "z", "code": "z", "name": "Z", "subject_area_id": "a", "parent_id": "y" },
    ],
  }))
  .unwrap();
  s.bulk_save(batch).await.unwrap();

  let err = s.delete_domain_concept("x".into()).await.unwrap_err();
  assert!(
    matches!(err, Error::Core(taxon_core::Error::CycleDetected(_))),
    "unexpected error: {err}"
  );

  assert_eq!(s.list_domain_concepts(None).await.unwrap().len(), 3);
}

// ─── Domain concepts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_domain_concepts_filters_by_area() {
  let s = store().await;
  let a = s.create_subject_area(NewSubjectArea::new("a", "A")).await.unwrap().area;
  let b = s.create_subject_area(NewSubjectArea::new("b", "B")).await.unwrap().area;

  let mut late = NewDomainConcept::new(&a.id, "late", "Late");
  late.sort_order = 9;
  s.create_domain_concept(late).await.unwrap();
  s.create_domain_concept(NewDomainConcept::new(&a.id, "early", "Early")).await.unwrap();
  s.create_domain_concept(NewDomainConcept::new(&b.id, "other", "Other")).await.unwrap();

  let in_a = s.list_domain_concepts(Some(a.id.clone())).await.unwrap();
  let codes: Vec<&str> = in_a.iter().map(|c| c.code.as_str()).collect();
  assert_eq!(codes, vec!["early", "late"]);

  assert_eq!(s.list_domain_concepts(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn update_domain_concept_keeps_subject_area() {
  let s = store().await;
  let a = s.create_subject_area(NewSubjectArea::new("a", "A")).await.unwrap().area;
  let concept = s
    .create_domain_concept(NewDomainConcept::new(&a.id, "docs", "Documents"))
    .await
    .unwrap();

  let patch = DomainConceptPatch {
    concept_type: Some(ConceptType::List),
    reference_id: Some("ref-doc-types".into()),
    ..Default::default()
  };
  let updated = s
    .update_domain_concept(concept.id.clone(), patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.subject_area_id, a.id);
  assert_eq!(updated.concept_type, ConceptType::List);
  assert_eq!(updated.reference_id.as_deref(), Some("ref-doc-types"));
  assert_eq!(updated.code, "docs");

  let stored = s.list_domain_concepts(None).await.unwrap();
  assert_eq!(stored[0], updated);
}

// ─── Bulk save ───────────────────────────────────────────────────────────────

fn sample_batch() -> BulkSave {
  serde_json::from_value(json!({
    "subject_areas": [
      { "id": "sa-1", "code": "person", "name": "Person" },
      { "id": "sa-2", "code": "docs", "name": "Documents", "parent_id": "sa-1", "sort_order": 1 },
    ],
    "domain_concepts": [
      { "id": "dc-1", "code": "inn", "name": "INN", "subject_area_id": "sa-1" },
      { "id": "dc-2", "code": "list", "name": "List", "subject_area_id": "sa-2",
        "concept_type": "list" },
    ],
  }))
  .unwrap()
}

#[tokio::test]
async fn bulk_save_is_idempotent() {
  let s = store().await;

  let first = s.bulk_save(sample_batch()).await.unwrap();
  assert_eq!(first.subject_areas.inserted, 2);
  assert_eq!(first.domain_concepts.inserted, 2);
  let areas_once = s.list_subject_areas().await.unwrap();
  let concepts_once = s.list_domain_concepts(None).await.unwrap();

  let second = s.bulk_save(sample_batch()).await.unwrap();
  assert_eq!(second.subject_areas.updated, 2);
  assert_eq!(second.subject_areas.inserted, 0);
  assert_eq!(second.domain_concepts.updated, 2);

  let areas_twice = s.list_subject_areas().await.unwrap();
  let concepts_twice = s.list_domain_concepts(None).await.unwrap();

  let strip = |v: &[taxon_core::subject_area::SubjectAreaNode]| {
    v.iter()
      .map(|n| (n.area.id.clone(), n.area.code.clone(), n.area.parent_id.clone(), n.is_terminal))
      .collect::<Vec<_>>()
  };
  assert_eq!(strip(&areas_once[..]), strip(&areas_twice[..]));
  assert_eq!(
    concepts_once.iter().map(|c| &c.id).collect::<Vec<_>>(),
    concepts_twice.iter().map(|c| &c.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn bulk_save_overwrites_only_present_fields() {
  let s = store().await;
  s.bulk_save(sample_batch()).await.unwrap();

  let batch = BulkSave {
    subject_areas:   vec![BulkSubjectArea {
      id: Some("sa-2".into()),
      name: Some("Papers".into()),
      ..Default::default()
    }],
    domain_concepts: vec![BulkDomainConcept {
      id: Some("dc-2".into()),
      subject_area_id: Some("sa-1".into()),
      parent_id: Some(Some("dc-1".into())),
      ..Default::default()
    }],
  };
  s.bulk_save(batch).await.unwrap();

  let areas = s.list_subject_areas().await.unwrap();
  let docs = areas.iter().find(|n| n.area.id == "sa-2").unwrap();
  assert_eq!(docs.area.name, "Papers");
  assert_eq!(docs.area.code, "docs");
  assert_eq!(docs.area.parent_id.as_deref(), Some("sa-1"));
  assert_eq!(docs.area.sort_order, 1);

  let concepts = s.list_domain_concepts(None).await.unwrap();
  let list = concepts.iter().find(|c| c.id == "dc-2").unwrap();
  assert_eq!(list.subject_area_id, "sa-2", "existing concepts never change area");
  assert_eq!(list.parent_id.as_deref(), Some("dc-1"));
  assert_eq!(list.concept_type, ConceptType::List);
}

#[tokio::test]
async fn bulk_save_without_ids_generates_them() {
  let s = store().await;
  let batch: BulkSave = serde_json::from_value(json!({
    "subject_areas": [{ "code": "x", "name": "X" }],
    "domain_concepts": [],
  }))
  .unwrap();
  let report = s.bulk_save(batch).await.unwrap();
  assert_eq!(report.subject_areas.inserted, 1);
  let areas = s.list_subject_areas().await.unwrap();
  assert!(!areas[0].area.id.is_empty());
}

#[tokio::test]
async fn bulk_save_failure_rolls_back_whole_batch() {
  let s = store().await;
  // A row with an undecodable timestamp makes the second record's lookup
  // fail after the first record has been written inside the transaction.
  s.execute_raw(
    "INSERT INTO subject_areas (id, code, name, sort_order, created_at, updated_at)
     VALUES ('broken', 'b', 'B', 0, 'not-a-date', 'not-a-date');",
  )
  .await
  .unwrap();

  let batch: BulkSave = serde_json::from_value(json!({
    "subject_areas": [
      { "id": "fresh", "code": "f", "name": "F" },
      { "id": "broken", "name": "Fixed" },
    ],
  }))
  .unwrap();
  let err = s.bulk_save(batch).await.unwrap_err();
  assert!(matches!(err, Error::DateParse(_)), "unexpected error: {err}");

  s.execute_raw("DELETE FROM subject_areas WHERE id = 'broken';").await.unwrap();
  assert!(s.list_subject_areas().await.unwrap().is_empty());
}

// ─── References ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reference_flags_roundtrip_and_patch() {
  let s = store().await;
  let mut input = NewReference::new("regions", "Regions");
  input.id = Some("ref-regions".into());
  input.is_hierarchical = true;
  let created = s.create_reference(input).await.unwrap();
  assert_eq!(created.id, "ref-regions");
  assert!(created.is_hierarchical);
  assert!(!created.data_by_script);

  let patch = ReferencePatch {
    data_by_script: Some(true),
    calculation_code: Some("regions_calc".into()),
    ..Default::default()
  };
  let updated = s
    .update_reference("ref-regions".into(), patch)
    .await
    .unwrap()
    .unwrap();
  assert!(updated.is_hierarchical);
  assert!(updated.data_by_script);
  assert_eq!(updated.calculation_code.as_deref(), Some("regions_calc"));

  let fetched = s.get_reference("ref-regions".into()).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_reference_removes_owned_rows_only() {
  let s = store().await;
  let genders = s.create_reference(NewReference::new("gender", "Gender")).await.unwrap();
  let people = s.create_reference(NewReference::new("people", "People")).await.unwrap();

  s.create_field(genders.id.clone(), NewReferenceField::new("code", "Code"))
    .await
    .unwrap()
    .unwrap();
  s.create_data(genders.id.clone(), NewReferenceData::new(payload(json!({ "code": "M" }))))
    .await
    .unwrap()
    .unwrap();

  // A field in another reference pointing at the one being deleted.
  let mut pointer = NewReferenceField::new("gender", "Gender");
  pointer.ref_reference_id = Some(genders.id.clone());
  let pointer = s.create_field(people.id.clone(), pointer).await.unwrap().unwrap();
  s.create_data(people.id.clone(), NewReferenceData::default())
    .await
    .unwrap()
    .unwrap();

  let deleted = s.delete_reference(genders.id.clone()).await.unwrap().unwrap();
  assert_eq!(deleted.id, genders.id);

  assert!(s.list_fields(genders.id.clone()).await.unwrap().is_empty());
  assert!(s.list_data(genders.id.clone(), None).await.unwrap().is_empty());

  let people_fields = s.list_fields(people.id.clone()).await.unwrap();
  assert_eq!(people_fields, vec![pointer]);
  assert_eq!(s.list_data(people.id.clone(), None).await.unwrap().len(), 1);

  assert!(s.delete_reference(genders.id).await.unwrap().is_none());
}

#[tokio::test]
async fn fields_are_scoped_to_their_reference() {
  let s = store().await;
  let r1 = s.create_reference(NewReference::new("r1", "R1")).await.unwrap();
  let r2 = s.create_reference(NewReference::new("r2", "R2")).await.unwrap();

  let field = s
    .create_field(r1.id.clone(), NewReferenceField::new("code", "Code").with_id("f-code"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(field.id, "f-code");
  assert_eq!(field.reference_id, r1.id);

  let patch = ReferenceFieldPatch { name: Some("Nope".into()), ..Default::default() };
  assert!(
    s.update_field(r2.id.clone(), field.id.clone(), patch)
      .await
      .unwrap()
      .is_none()
  );
  assert!(s.delete_field(r2.id.clone(), field.id.clone()).await.unwrap().is_none());

  let patch = ReferenceFieldPatch { sort_order: Some(4), ..Default::default() };
  let updated = s
    .update_field(r1.id.clone(), field.id.clone(), patch)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.sort_order, 4);
  assert_eq!(updated.name, "Code");
}

#[tokio::test]
async fn create_field_for_missing_reference_returns_none() {
  let s = store().await;
  let result = s
    .create_field("ghost".into(), NewReferenceField::new("code", "Code"))
    .await
    .unwrap();
  assert!(result.is_none());
  let result = s
    .create_data("ghost".into(), NewReferenceData::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn deleting_field_leaves_payload_keys() {
  let s = store().await;
  let r = s.create_reference(NewReference::new("gender", "Gender")).await.unwrap();
  s.create_field(r.id.clone(), NewReferenceField::new("code", "Code").with_id("code"))
    .await
    .unwrap();
  s.create_field(r.id.clone(), NewReferenceField::new("name", "Name").with_id("name"))
    .await
    .unwrap();
  let row = s
    .create_data(
      r.id.clone(),
      NewReferenceData::new(payload(json!({ "code": "M", "name": "Male" }))),
    )
    .await
    .unwrap()
    .unwrap();

  s.delete_field(r.id.clone(), "name".into()).await.unwrap().unwrap();

  let rows = s.list_data(r.id.clone(), None).await.unwrap();
  assert_eq!(rows[0].data, payload(json!({ "code": "M", "name": "Male" })));

  let report = s.check_data(r.id.clone()).await.unwrap().unwrap();
  assert_eq!(report.len(), 1);
  assert_eq!(report[0].data_id, row.id);
  assert_eq!(report[0].keys, vec!["name"]);

  assert!(s.check_data("ghost".into()).await.unwrap().is_none());
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_data_filters_by_exact_value() {
  let s = store().await;
  let r = s.create_reference(NewReference::new("gender", "Gender")).await.unwrap();
  for (code, name) in [("M", "Male"), ("F", "Female")] {
    s.create_data(
      r.id.clone(),
      NewReferenceData::new(payload(json!({ "code": code, "name": name }))),
    )
    .await
    .unwrap()
    .unwrap();
  }
  s.create_data(r.id.clone(), NewReferenceData::new(payload(json!({ "name": "Unknown" }))))
    .await
    .unwrap()
    .unwrap();

  let filter = DataFilter::from_params(Some("code".into()), Some("M".into()));
  let rows = s.list_data(r.id.clone(), filter).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].data["name"], "Male");

  let all = s.list_data(r.id.clone(), None).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn malformed_payload_lists_as_empty() {
  let s = store().await;
  let r = s
    .create_reference(NewReference { id: Some("r".into()), ..NewReference::new("r", "R") })
    .await
    .unwrap();
  s.execute_raw(
    "INSERT INTO reference_data (id, reference_id, data_json, created_at, updated_at)
     VALUES ('bad', 'r', '{oops', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');",
  )
  .await
  .unwrap();

  let rows = s.list_data(r.id.clone(), None).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert!(rows[0].data.is_empty());

  let filter = DataFilter::from_params(Some("code".into()), Some("M".into()));
  assert!(s.list_data(r.id, filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_data_replaces_payload_and_keeps_parent() {
  let s = store().await;
  let mut input = NewReference::new("regions", "Regions");
  input.is_hierarchical = true;
  let r = s.create_reference(input).await.unwrap();

  let country = s
    .create_data(r.id.clone(), NewReferenceData::new(payload(json!({ "name": "Country" }))))
    .await
    .unwrap()
    .unwrap();
  let region = s
    .create_data(
      r.id.clone(),
      NewReferenceData {
        parent_id: Some(country.id.clone()),
        ..NewReferenceData::new(payload(json!({ "name": "Region" })))
      },
    )
    .await
    .unwrap()
    .unwrap();

  let patch = ReferenceDataPatch {
    parent_id: None,
    data:      Some(payload(json!({ "name": "Province", "code": 7 }))),
  };
  let updated = s
    .update_data(r.id.clone(), region.id.clone(), patch)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.parent_id.as_deref(), Some(country.id.as_str()));
  assert_eq!(updated.data, payload(json!({ "name": "Province", "code": 7 })));

  let deleted = s.delete_data(r.id.clone(), country.id.clone()).await.unwrap().unwrap();
  assert_eq!(deleted.id, country.id);
  let left = s.list_data(r.id.clone(), None).await.unwrap();
  assert_eq!(left.len(), 1, "deleting a data row does not cascade");
  assert!(s.delete_data(r.id, country.id).await.unwrap().is_none());
}

mod common;

use common::{sample_zip, spawn_feature};
use grokview_app::Catalogue;
use grokview_core::{ContentFilter, OverviewCommand};
use pretty_assertions::assert_eq;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn catalogue_lists_only_filtered_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_zip(dir.path(), "gallery.zip");
    let feature = spawn_feature();

    feature
        .execute(OverviewCommand::AddContentFilter(ContentFilter::Images))
        .await
        .unwrap();
    feature
        .execute(OverviewCommand::UploadArchives(vec![path.clone()]))
        .await
        .unwrap();
    let catalogue = Catalogue::from_state(&feature.settled().await.unwrap());

    assert_eq!(catalogue.archives.len(), 1);
    let archive = &catalogue.archives[0];
    assert_eq!(archive.name, "gallery.zip");
    assert_eq!(archive.status, "processed");
    assert_eq!(archive.total_contents, 3);
    assert_eq!(catalogue.visible_count(), 1);
    assert_eq!(archive.contents[0].mime_type, "image/png");
    assert_eq!(archive.contents[0].path, "images/picture.png");

    let plain = catalogue.render_plain();
    assert!(plain.starts_with("gallery.zip [processed] 1 of 3 contents\n"));
    assert!(plain.contains("images/picture.png"));

    let json: serde_json::Value = serde_json::to_value(&catalogue).unwrap();
    assert_eq!(json["archives"][0]["contents"][0]["extension"], "png");
    assert!(json["archives"][0].get("failure").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn any_date_bound_hides_undated_and_out_of_range_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_zip(dir.path(), "dated.zip");
    let feature = spawn_feature();

    feature
        .execute(OverviewCommand::UploadArchives(vec![path]))
        .await
        .unwrap();
    feature.settled().await.unwrap();
    // DOS timestamps start in 1980, so nothing falls in the first second of 1970.
    feature
        .execute(OverviewCommand::SetDateRange {
            start: Some(0),
            end: Some(1_000),
        })
        .await
        .unwrap();

    let catalogue = Catalogue::from_state(&feature.state());
    assert_eq!(catalogue.visible_count(), 0);
    assert_eq!(catalogue.archives[0].total_contents, 3);
}

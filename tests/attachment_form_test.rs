use anyhow::Result;
use httpmock::prelude::*;
use merch_reorder::domain::attachment::{build_form, AttachmentChange};
use merch_reorder::{RestCollection, TomlConfig};

fn backend_for(server: &MockServer) -> Result<RestCollection> {
    let toml_content = format!(
        r#"
[collection]
name = "brands"
endpoint = "{}"
"#,
        server.url("/brands")
    );
    Ok(RestCollection::new(&TomlConfig::from_toml_str(&toml_content)?)?)
}

/// 上傳新圖片與移除舊圖片在送出時才解析成 multipart 欄位
#[tokio::test]
async fn test_form_carries_upload_and_removal() -> Result<()> {
    let server = MockServer::start_async().await;
    let form_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/brands/17")
                .body_contains("name=\"logo\"; filename=\"logo.png\"")
                .body_contains("name=\"banner_remove\"")
                .body_contains("Acme Outdoor");
            then.status(200);
        })
        .await;

    let backend = backend_for(&server)?;
    let form = build_form(
        &[("name".to_string(), "Acme Outdoor".to_string())],
        &[
            (
                "logo".to_string(),
                AttachmentChange::Upload {
                    file_name: "logo.png".to_string(),
                    mime: "image/png".to_string(),
                    bytes: b"PNGDATA".to_vec(),
                },
            ),
            ("banner".to_string(), AttachmentChange::Remove),
            ("thumbnail".to_string(), AttachmentChange::Keep),
        ],
    )?;

    backend.post_form("17", form).await?;
    form_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_kept_attachment_is_not_sent() -> Result<()> {
    let server = MockServer::start_async().await;
    let with_image = server
        .mock_async(|when, then| {
            when.method(POST).path("/brands/3").body_contains("thumbnail");
            then.status(500);
        })
        .await;
    let without_image = server
        .mock_async(|when, then| {
            when.method(POST).path("/brands/3");
            then.status(200);
        })
        .await;

    let backend = backend_for(&server)?;
    let form = build_form(
        &[("name".to_string(), "Plain".to_string())],
        &[("thumbnail".to_string(), AttachmentChange::Keep)],
    )?;

    backend.post_form("3", form).await?;
    assert_eq!(with_image.hits_async().await, 0);
    without_image.assert_async().await;
    Ok(())
}

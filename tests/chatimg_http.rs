use base64::Engine as _;
use base64::engine::general_purpose;
use chatimg::config::ChatImgConfig;
use chatimg::host::User;
use chatimg::plugins::ChatImg;
use image::DynamicImage;
use image::ImageFormat;
use image::RgbImage;
use mockito::Mock;
use mockito::Server;
use mockito::ServerGuard;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Cursor;
use std::io::Write;

fn image_mock(server: &mut ServerGuard, path: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(body)
        .create()
}

fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).expect("encode");
    out.into_inner()
}

fn small_png() -> Vec<u8> {
    encoded(&DynamicImage::new_rgb8(40, 20), ImageFormat::Png)
}

/// Random pixels so the PNG stays well above the inline limit.
fn large_png() -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(11);
    let pixels = RgbImage::from_fn(1000, 400, |_, _| image::Rgb(rng.random()));
    let bytes = encoded(&DynamicImage::ImageRgb8(pixels), ImageFormat::Png);
    assert!(bytes.len() > 256 * 1024, "test image too small: {}", bytes.len());
    bytes
}

fn alice() -> User {
    User {
        session: 1,
        name: "alice".into(),
        channel: 5,
    }
}

fn payload(html: &str) -> Vec<u8> {
    let start = html.find("base64,").expect("data uri") + "base64,".len();
    let end = start + html[start..].find('"').expect("closing quote");
    general_purpose::STANDARD
        .decode(&html[start..end])
        .expect("valid base64")
}

#[test]
fn small_image_is_posted_inline_with_link() -> eyre::Result<()> {
    let png = small_png();
    let mut server = Server::new();
    let mock = image_mock(&mut server, "/a.png", &png);
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let url = format!("{}/a.png", server.url());
    let replies = plugin.replies(&alice(), &format!("!img look href=\"{url}\""));
    mock.assert();
    assert_eq!(replies.len(), 1);
    let html = &replies[0];
    assert!(html.starts_with(&format!(
        "<a href=\"{url}\"><img src=\"data:image/png;charset=utf-8;base64,"
    )));
    assert!(html.ends_with(" /></a>"));
    assert_eq!(payload(html), png);
    Ok(())
}

#[test]
fn wide_inline_image_gets_width_attribute() -> eyre::Result<()> {
    let png = encoded(&DynamicImage::new_rgb8(800, 10), ImageFormat::Png);
    let mut server = Server::new();
    let _wide = image_mock(&mut server, "/wide.png", &png);
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/wide.png\"", server.url()));
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("\" width=\"500.0\" />"));
    Ok(())
}

#[test]
fn large_image_is_thumbnailed_as_jpeg() -> eyre::Result<()> {
    let mut server = Server::new();
    let _big = image_mock(&mut server, "/big.png", &large_png());
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href='{}/big.png'", server.url()));
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("<img src=\"data:image/jpeg;charset=utf-8;base64,"));

    let thumb = image::load_from_memory(&payload(&replies[0]))?;
    assert_eq!((thumb.width(), thumb.height()), (500, 200));
    Ok(())
}

#[test]
fn response_without_length_is_sized_from_its_body() -> eyre::Result<()> {
    let png = small_png();
    let body = png.clone();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/chunked.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_chunked_body(move |w| w.write_all(&body))
        .create();
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/chunked.png\"", server.url()));
    mock.assert();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("<img src=\"data:image/png;charset=utf-8;base64,"));
    assert_eq!(payload(&replies[0]), png);
    Ok(())
}

#[test]
fn large_response_without_length_is_thumbnailed() -> eyre::Result<()> {
    let body = large_png();
    let mut server = Server::new();
    let _big = server
        .mock("GET", "/big-chunked.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_chunked_body(move |w| w.write_all(&body))
        .create();
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/big-chunked.png\"", server.url()));
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("<img src=\"data:image/jpeg;charset=utf-8;base64,"));
    Ok(())
}

#[test]
fn every_link_gets_its_own_message() -> eyre::Result<()> {
    let mut server = Server::new();
    let _one = image_mock(&mut server, "/one.png", &small_png());
    let _two = image_mock(&mut server, "/two.png", &small_png());
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let base = server.url();
    let replies = plugin.replies(
        &alice(),
        &format!("!img href=\"{base}/one.png\" href=\"{base}/two.png\""),
    );
    assert_eq!(replies.len(), 2);
    assert!(replies[0].contains("/one.png\">"));
    assert!(replies[1].contains("/two.png\">"));
    Ok(())
}

#[test]
fn non_image_content_is_reported() -> eyre::Result<()> {
    let mut server = Server::new();
    let _page = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .create();
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/page\"", server.url()));
    assert_eq!(
        replies,
        vec!["Image Posted by alice, isn't an image, or some odd format.".to_string()]
    );
    Ok(())
}

#[test]
fn missing_url_is_reported() -> eyre::Result<()> {
    let mut server = Server::new();
    let _gone = server.mock("GET", "/gone.png").with_status(404).create();
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/gone.png\"", server.url()));
    assert_eq!(
        replies,
        vec!["Invalid URL linked by alice , cannot resolve".to_string()]
    );
    Ok(())
}

#[test]
fn undecodable_image_is_reported_like_a_bad_url() -> eyre::Result<()> {
    let mut server = Server::new();
    let _broken = image_mock(&mut server, "/broken.png", b"definitely not a png");
    let plugin = ChatImg::new(ChatImgConfig::default())?;

    let replies = plugin.replies(&alice(), &format!("!img href=\"{}/broken.png\"", server.url()));
    assert_eq!(
        replies,
        vec!["Invalid URL linked by alice , cannot resolve".to_string()]
    );
    Ok(())
}

#[test]
fn silent_mode_posts_images_but_not_errors() -> eyre::Result<()> {
    let mut server = Server::new();
    let _image = image_mock(&mut server, "/a.png", &small_png());
    let missing = server.mock("GET", "/nope.png").with_status(404).expect(2).create();
    let _page = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .create();
    let plugin = ChatImg::new(ChatImgConfig {
        shebang_required: false,
        ..ChatImgConfig::default()
    })?;
    let base = server.url();

    let ok = plugin.replies(&alice(), &format!("<a href=\"{base}/a.png\">pic</a>"));
    assert_eq!(ok.len(), 1);

    let failed = plugin.replies(&alice(), &format!("<a href=\"{base}/nope.png\">pic</a>"));
    assert!(failed.is_empty());

    let not_image = plugin.replies(&alice(), &format!("<a href=\"{base}/page\">page</a>"));
    assert!(not_image.is_empty());

    // Errors are still reported when the keyword is used
    let keyword_failed = plugin.replies(&alice(), &format!("!img href=\"{base}/nope.png\""));
    assert_eq!(keyword_failed.len(), 1);
    missing.assert();
    Ok(())
}

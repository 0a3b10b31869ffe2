use std::fs::{self, File};
use std::io::Read;

use site_optimizer::package::{archive_name, create_package, PackageError};
use tempfile::TempDir;

#[test]
fn archive_holds_paths_relative_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let dist = dir.path().join("dist");
    fs::create_dir_all(dist.join("images/icons")).unwrap();
    fs::write(dist.join("index.html"), "<head></head>").unwrap();
    fs::write(dist.join("style.min.css"), ".a{color:red}").unwrap();
    fs::write(dist.join("images/icons/x.svg"), "<svg/>").unwrap();

    let summary = create_package(&dist, dir.path(), "site").unwrap();
    assert_eq!(summary.files, 3);
    assert!(summary.bytes > 0);
    assert_eq!(summary.path.parent().unwrap(), dir.path());

    let mut archive = zip::ZipArchive::new(File::open(&summary.path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(names, vec!["images/icons/x.svg", "index.html", "style.min.css"]);

    let mut css = String::new();
    archive
        .by_name("style.min.css")
        .unwrap()
        .read_to_string(&mut css)
        .unwrap();
    assert_eq!(css, ".a{color:red}");
}

#[test]
fn missing_output_dir_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = create_package(&dir.path().join("dist"), dir.path(), "site").unwrap_err();
    assert!(matches!(err, PackageError::MissingOutput(_)));
    assert!(err.to_string().contains("run `site-optimizer build` first"));
}

#[test]
fn archive_name_has_prefix_and_timestamp() {
    let name = archive_name("western-cape-industrial-website");
    let stamp = name
        .strip_prefix("western-cape-industrial-website_")
        .and_then(|rest| rest.strip_suffix(".zip"))
        .unwrap();
    assert_eq!(stamp.len(), "20240101_120000".len());
    assert_eq!(&stamp[8..9], "_");
    assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
}

#[test]
fn destination_inside_output_dir_is_refused() {
    let dir = TempDir::new().unwrap();
    let dist = dir.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("index.html"), "<head></head>").unwrap();

    for destination in [dist.clone(), dist.join("packages")] {
        let err = create_package(&dist, &destination, "site").unwrap_err();
        assert!(matches!(err, PackageError::DestinationInsideOutput(_)));
    }
    let entries: Vec<_> = fs::read_dir(&dist).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

//! Resolution and creation against real configuration directories.

use nerdnet_schema::{is_external, render, TemplateParams, DEFAULT_NETWORK_NAME};
use nerdnet_store::{
    create, inspect, list, resolve, NativeNetwork, NetConfDir, NetworkDescriptor, Provenance,
    StoreError,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write(dir: &Path, file: &str, body: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, body).unwrap();
    path
}

fn bridge_list(name: &str, bridge: &str) -> String {
    format!(
        r#"{{
  "cniVersion": "0.4.0",
  "name": "{name}",
  "plugins": [
    {{ "type": "bridge", "bridge": "{bridge}", "ipam": {{ "type": "host-local" }} }},
    {{ "type": "portmap", "capabilities": {{ "portMappings": true }} }}
  ]
}}"#
    )
}

fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn created_networks_resolve_as_managed() {
    let tmp = tempfile::tempdir().unwrap();
    let net_d = tmp.path().join("net.d");

    for (name, subnet) in [
        ("alpha", "10.10.0.0/16"),
        ("beta", "10.11.0.0/24"),
        ("gamma9", "172.20.0.0/30"),
    ] {
        create(&net_d, name, subnet).unwrap();
    }

    let resolved = resolve(&net_d).unwrap();
    for name in ["alpha", "beta", "gamma9"] {
        let d = resolved.iter().find(|d| d.name() == name).unwrap();
        assert!(d.managed, "{name} must be managed");
        assert_eq!(d.provenance(), Provenance::Managed);
        assert_eq!(
            d.file.as_deref(),
            Some(NetConfDir::new(&net_d).list_path(name).as_path())
        );
    }
}

#[test]
fn missing_directory_is_not_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let resolved = resolve(&tmp.path().join("never-created")).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), DEFAULT_NETWORK_NAME);
        assert_eq!(resolved[0].provenance(), Provenance::Builtin);
    }
}

#[test]
fn shared_names_keep_file_name_order_across_runs() {
    let tmp = tempfile::tempdir().unwrap();
    // Written out of order on purpose.
    write(tmp.path(), "30-c.conflist", &bridge_list("shared", "br-c"));
    write(tmp.path(), "10-a.conflist", &bridge_list("shared", "br-a"));
    write(tmp.path(), "20-b.conf", r#"{"name":"shared","type":"macvlan"}"#);

    let expected = vec![
        tmp.path().join("10-a.conflist"),
        tmp.path().join("20-b.conf"),
        tmp.path().join("30-c.conflist"),
    ];
    for _ in 0..3 {
        let resolved = resolve(tmp.path()).unwrap();
        let files: Vec<PathBuf> = resolved.iter().filter_map(|d| d.file.clone()).collect();
        assert_eq!(files, expected);
        assert!(resolved.iter().skip(1).all(|d| d.name() == "shared"));
    }
}

#[test]
fn duplicate_create_leaves_directory_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    create(tmp.path(), "foo", "10.5.0.0/16").unwrap();
    let before = dir_entries(tmp.path());
    let content_before = fs::read(&before[0]).unwrap();

    let err = create(tmp.path(), "foo", "10.6.0.0/16").unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(dir_entries(tmp.path()), before);
    assert_eq!(fs::read(&before[0]).unwrap(), content_before);
}

#[test]
fn rejected_create_adds_no_entries_to_foreign_directory() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "10-foo.conflist", &bridge_list("foo", "br-foo"));
    let before = dir_entries(tmp.path());

    let err = create(tmp.path(), "foo", "10.5.0.0/16").unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(dir_entries(tmp.path()), before);
}

#[test]
fn rendered_lists_classify_as_managed() {
    let bytes = render(&TemplateParams {
        name: "foo",
        bridge: "cni-nerdctl-foo",
        subnet: "10.5.0.0/16",
        gateway: "10.5.0.1",
    })
    .unwrap();
    assert!(!is_external(&bytes));
}

#[test]
fn hand_written_marker_is_honored() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "50-hand.conflist",
        r#"{"name":"hand","nerdctl":true,"plugins":[{"type":"bridge"}]}"#,
    );
    write(tmp.path(), "60-other.conflist", &bridge_list("other", "br0"));

    let kinds: Vec<(String, Provenance)> = list(tmp.path())
        .unwrap()
        .into_iter()
        .map(|s| (s.name, s.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("nerdctl".to_owned(), Provenance::Builtin),
            ("hand".to_owned(), Provenance::Managed),
            ("other".to_owned(), Provenance::External),
        ]
    );
}

#[test]
fn unparseable_file_fails_list_inspect_and_create() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "10-ok.conflist", &bridge_list("ok", "br0"));
    write(tmp.path(), "20-broken.conflist", r#"{"name":"broken","plugins":[]}"#);

    assert!(matches!(list(tmp.path()), Err(StoreError::Parse { .. })));
    assert!(matches!(
        inspect(tmp.path(), &["ok"]),
        Err(StoreError::Parse { .. })
    ));
    assert!(matches!(
        create(tmp.path(), "foo", "10.5.0.0/16"),
        Err(StoreError::Parse { .. })
    ));
}

#[test]
fn inspect_returns_bodies_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let body = bridge_list("podman", "cni-podman0");
    write(tmp.path(), "87-podman-bridge.conflist", &body);

    let got: Vec<NetworkDescriptor> = inspect(tmp.path(), &["podman"]).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].bytes(), body.as_bytes());
    assert!(!got[0].managed);

    let native = NativeNetwork::try_from(&got[0]).unwrap();
    assert_eq!(native.cni.get(), body);
}

#[test]
fn native_view_keeps_key_order() {
    let tmp = tempfile::tempdir().unwrap();
    let body = r#"{"name":"zed","cniVersion":"0.4.0","plugins":[{"type":"bridge","bridge":"br0"}]}"#;
    write(tmp.path(), "10-zed.conflist", body);

    let got = inspect(tmp.path(), &["zed"]).unwrap();
    let native = NativeNetwork::try_from(&got[0]).unwrap();
    let out = serde_json::to_string(&native).unwrap();
    assert!(out.starts_with(&format!(r#"{{"CNI":{body},"#)), "{out}");
}

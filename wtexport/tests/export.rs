use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wad::animated::{Animated, AnimatedEntry};
use wad::lumps::{PatchNames, TextureFormat, TextureList};
use wad::switches::{SwitchEntry, Switches};
use wad::texture_set::{Texture, TextureSet};
use wad::{WadData, WadKind};
use wtexport::{EXIT_BAD_FILE, ExportError, ExportOptions, run};

fn add_textures(wad: &mut WadData, format: TextureFormat, textures: &[Texture]) {
    let mut set = TextureSet::new();
    for texture in textures {
        set.insert(texture.clone()).unwrap();
    }
    let (pnames, list, _) = set.export(format, None).unwrap();
    wad.add_lump("PNAMES", pnames.to_bytes()).unwrap();
    wad.add_lump("TEXTURE1", list.to_bytes().unwrap()).unwrap();
}

fn add_namespace(wad: &mut WadData, ns: &str, entries: &[(&str, &str)]) {
    wad.add_lump(&format!("{ns}_START"), Vec::new()).unwrap();
    for (name, data) in entries {
        wad.add_lump(name, data.as_bytes().to_vec()).unwrap();
    }
    wad.add_lump(&format!("{ns}_END"), Vec::new()).unwrap();
}

fn save(dir: &TempDir, name: &str, wad: &WadData) -> PathBuf {
    let path = dir.path().join(name);
    wad.save(&path).unwrap();
    path
}

/// Base with only the null texture
fn base_wad(dir: &TempDir) -> PathBuf {
    let mut wad = WadData::create(WadKind::Iwad);
    add_textures(
        &mut wad,
        TextureFormat::Doom,
        &[Texture::new("AASTINKY", 24, 72).with_patch("WALL00", 0, 0)],
    );
    save(dir, "base.wad", &wad)
}

/// DOOR3 made of DOOR01, with DOOR01's data given
fn door_wad(dir: &TempDir, name: &str, door01: &str) -> PathBuf {
    let mut wad = WadData::create(WadKind::Pwad);
    add_textures(
        &mut wad,
        TextureFormat::Doom,
        &[Texture::new("DOOR3", 64, 72).with_patch("DOOR01", 0, 0)],
    );
    add_namespace(&mut wad, "P", &[("DOOR01", door01)]);
    save(dir, name, &wad)
}

fn options(dir: &TempDir, files: Vec<PathBuf>, base: PathBuf) -> ExportOptions {
    ExportOptions::new(files, base, dir.path().join("out.wad"))
}

fn lump_names(wad: &WadData) -> Vec<&str> {
    wad.lumps().iter().map(|l| l.name.as_str()).collect()
}

fn texture_names(wad: &WadData, lump: &str) -> Vec<String> {
    let list = TextureList::from_bytes(lump, &wad.get_lump(lump).unwrap().data).unwrap();
    list.textures.into_iter().map(|t| t.name).collect()
}

fn open(path: &Path) -> WadData {
    WadData::open(path).unwrap()
}

#[test]
fn simple_extraction() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = door_wad(&dir, "doors.wad", "door pixels");
    let options = options(&dir, vec![source], base);

    let summary = run(&options, &b"-textures\nDOOR3\n-flats\n-end\n"[..]).unwrap();
    assert_eq!(summary.textures, 2);
    assert_eq!(summary.patches, 1);

    let out = open(&options.output);
    assert_eq!(
        lump_names(&out),
        vec!["TEXTURE1", "PNAMES", "PP_START", "DOOR01", "PP_END"]
    );
    assert_eq!(texture_names(&out, "TEXTURE1"), vec!["AASTINKY", "DOOR3"]);
    let pnames = PatchNames::from_bytes(&out.get_lump("PNAMES").unwrap().data).unwrap();
    assert!(pnames.names.contains(&"DOOR01".to_owned()));
    assert_eq!(out.get_lump("DOOR01").unwrap().data, b"door pixels");
}

#[test]
fn missing_request_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = door_wad(&dir, "doors.wad", "door");
    let options = options(&dir, vec![source], base);

    run(&options, &b"-textures\nNOWHERE\n-flats\nNOFLAT\n"[..]).unwrap();

    let out = open(&options.output);
    assert_eq!(texture_names(&out, "TEXTURE1"), vec!["AASTINKY"]);
    assert!(!out.lump_exists("PP_START"));
    assert!(!out.lump_exists("FF_START"));
}

#[test]
fn texture_without_pnames_aborts() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let mut wad = WadData::create(WadKind::Pwad);
    wad.add_lump("TEXTURE1", TextureList::new(TextureFormat::Doom).to_bytes().unwrap())
        .unwrap();
    let source = save(&dir, "broken.wad", &wad);
    let options = options(&dir, vec![source], base);

    let err = run(&options, &b"-textures\nDOOR3\n"[..]).unwrap_err();
    assert!(matches!(err, ExportError::MissingPatchTable { .. }));
    assert_eq!(err.exit_code(), EXIT_BAD_FILE);
    assert!(!options.output.exists());
}

#[test]
fn unreadable_source() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let bogus = dir.path().join("bogus.wad");
    std::fs::write(&bogus, b"not a wad").unwrap();
    let options = options(&dir, vec![bogus, dir.path().join("missing.wad")], base);

    let err = run(&options, &b"-textures\nDOOR3\n"[..]).unwrap_err();
    assert!(matches!(err, ExportError::ArchiveOpenFailure { .. }));
    assert_eq!(err.exit_code(), EXIT_BAD_FILE);
}

#[test]
fn first_listed_source_wins() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let a = door_wad(&dir, "a.wad", "from a");
    let b = door_wad(&dir, "b.wad", "from b");
    let request = b"-textures\nDOOR3\n";

    run(&options(&dir, vec![a.clone(), b.clone()], base.clone()), &request[..]).unwrap();
    let out = open(&dir.path().join("out.wad"));
    assert_eq!(out.get_lump("DOOR01").unwrap().data, b"from a");

    run(&options(&dir, vec![b, a], base), &request[..]).unwrap();
    let out = open(&dir.path().join("out.wad"));
    assert_eq!(out.get_lump("DOOR01").unwrap().data, b"from b");
}

#[test]
fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = door_wad(&dir, "doors.wad", "door");
    let options = options(&dir, vec![source], base);
    let request = b"-textures\nDOOR3\nSW1BRN1\n-flats\nNUKAGE1\n";

    run(&options, &request[..]).unwrap();
    let first = std::fs::read(&options.output).unwrap();
    run(&options, &request[..]).unwrap();
    let second = std::fs::read(&options.output).unwrap();
    assert_eq!(first, second);
}

/// GLOW1..GLOW3 animate, SWOFF/SWON switch, GOOP1..GOOP2 are animated flats
fn animated_wad(dir: &TempDir) -> PathBuf {
    let mut wad = WadData::create(WadKind::Pwad);
    add_textures(
        &mut wad,
        TextureFormat::Doom,
        &[
            Texture::new("GLOW1", 64, 64).with_patch("GLOWP1", 0, 0),
            Texture::new("GLOW2", 64, 64).with_patch("GLOWP2", 0, 0),
            Texture::new("GLOW3", 64, 64).with_patch("GLOWP3", 0, 0),
            Texture::new("SWOFF", 64, 64).with_patch("SWP1", 0, 0),
            Texture::new("SWON", 64, 64).with_patch("SWP2", 0, 0),
            Texture::new("PLAIN", 64, 64).with_patch("PLAINP", 0, 0),
        ],
    );
    let animated = Animated {
        entries: vec![
            AnimatedEntry::texture("GLOW3", "GLOW1", 6, false),
            AnimatedEntry::flat("GOOP2", "GOOP1", 12),
            // Nothing from these is requested
            AnimatedEntry::texture("DRIP3", "DRIP1", 8, false),
        ],
    };
    wad.add_lump("ANIMATED", animated.to_bytes()).unwrap();
    let switches = Switches {
        entries: vec![
            SwitchEntry::new("SWOFF", "SWON", 3),
            SwitchEntry::new("SW1NONE", "SW2NONE", 3),
        ],
    };
    wad.add_lump("SWITCHES", switches.to_bytes()).unwrap();
    add_namespace(
        &mut wad,
        "P",
        &[
            ("GLOWP1", "g1"),
            ("GLOWP2", "g2"),
            ("GLOWP3", "g3"),
            ("SWP1", "s1"),
            ("SWP2", "s2"),
            ("PLAINP", "p"),
        ],
    );
    add_namespace(&mut wad, "F", &[("GOOP1", "f1"), ("GOOP2", "f2")]);
    save(dir, "anim.wad", &wad)
}

#[test]
fn animation_and_switch_closure() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = animated_wad(&dir);
    let options = options(&dir, vec![source], base);

    let summary = run(&options, &b"-textures\nGLOW2\nSWOFF\n-flats\nGOOP2\n"[..]).unwrap();
    assert_eq!(summary.animated, 2);
    assert_eq!(summary.switches, 1);

    let out = open(&options.output);
    let textures = texture_names(&out, "TEXTURE1");
    for name in ["GLOW1", "GLOW2", "GLOW3", "SWOFF", "SWON"] {
        assert!(textures.contains(&name.to_owned()), "{name} missing");
    }
    assert!(!textures.contains(&"PLAIN".to_owned()));
    assert!(out.lump_exists("GOOP1"));
    assert!(out.lump_exists("GOOP2"));

    let animated = Animated::from_bytes(&out.get_lump("ANIMATED").unwrap().data).unwrap();
    assert_eq!(
        animated.entries,
        vec![
            AnimatedEntry::texture("GLOW3", "GLOW1", 6, false),
            AnimatedEntry::flat("GOOP2", "GOOP1", 12),
        ]
    );
    let switches = Switches::from_bytes(&out.get_lump("SWITCHES").unwrap().data).unwrap();
    assert_eq!(switches.entries, vec![SwitchEntry::new("SWOFF", "SWON", 3)]);

    // Every name in the tables is in the output
    let flats: HashSet<&str> = lump_names(&out).into_iter().collect();
    for entry in animated.iter() {
        for name in [&entry.first_name, &entry.last_name] {
            if entry.is_texture() {
                assert!(textures.contains(name), "{name} dangling");
            } else {
                assert!(flats.contains(name.as_str()), "{name} dangling");
            }
        }
    }
    for entry in switches.iter() {
        assert!(textures.contains(&entry.off_name));
        assert!(textures.contains(&entry.on_name));
    }
}

#[test]
fn tables_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = animated_wad(&dir);
    let mut options = options(&dir, vec![source], base);
    options.animated = false;
    options.switches = false;

    run(&options, &b"-textures\nGLOW2\nSWOFF\n"[..]).unwrap();
    let out = open(&options.output);
    assert_eq!(
        texture_names(&out, "TEXTURE1"),
        vec!["AASTINKY", "GLOW2", "SWOFF"]
    );
    assert!(!out.lump_exists("ANIMATED"));
    assert!(!out.lump_exists("SWITCHES"));
}

#[test]
fn additive_output_keeps_existing_lumps() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let source = door_wad(&dir, "doors.wad", "door");
    let mut options = options(&dir, vec![source], base);

    let mut existing = WadData::create(WadKind::Pwad);
    existing.add_lump("MAP01", Vec::new()).unwrap();
    existing.add_lump("THINGS", vec![1, 2, 3]).unwrap();
    save(&dir, "out.wad", &existing);

    options.additive = true;
    run(&options, &b"-textures\nDOOR3\n"[..]).unwrap();
    let out = open(&options.output);
    assert_eq!(&lump_names(&out)[..2], ["MAP01", "THINGS"]);
    assert!(out.lump_exists("DOOR01"));

    options.additive = false;
    run(&options, &b"-textures\nDOOR3\n"[..]).unwrap();
    assert!(!open(&options.output).lump_exists("MAP01"));
}

#[test]
fn strife_base_with_texture2() {
    let dir = TempDir::new().unwrap();

    let mut base = WadData::create(WadKind::Iwad);
    let mut set = TextureSet::new();
    set.insert(Texture::new("AASHITTY", 8, 8).with_patch("WALL00", 0, 0))
        .unwrap();
    set.insert(Texture::new("EXTRA", 8, 8).with_patch("WALL00", 0, 0))
        .unwrap();
    let primary: HashSet<String> = ["AASHITTY".to_owned()].into_iter().collect();
    let (pnames, list1, list2) = set.export(TextureFormat::Strife, Some(&primary)).unwrap();
    base.add_lump("PNAMES", pnames.to_bytes()).unwrap();
    base.add_lump("TEXTURE1", list1.to_bytes().unwrap()).unwrap();
    base.add_lump("TEXTURE2", list2.unwrap().to_bytes().unwrap()).unwrap();
    let base = save(&dir, "strife1.wad", &base);

    let source = door_wad(&dir, "doors.wad", "door");
    let options = options(&dir, vec![source], base);
    run(&options, &b"-textures\nDOOR3\n"[..]).unwrap();

    let out = open(&options.output);
    assert_eq!(texture_names(&out, "TEXTURE1"), vec!["AASHITTY"]);
    assert_eq!(texture_names(&out, "TEXTURE2"), vec!["EXTRA", "DOOR3"]);
    let data = &out.get_lump("TEXTURE2").unwrap().data;
    assert_eq!(
        TextureFormat::detect("TEXTURE2", data).unwrap(),
        TextureFormat::Strife
    );
}

#[test]
fn bad_request_list() {
    let dir = TempDir::new().unwrap();
    let base = base_wad(&dir);
    let options = options(&dir, vec![door_wad(&dir, "doors.wad", "door")], base);
    let err = run(&options, &b"DOOR3\n"[..]).unwrap_err();
    assert_eq!(err.exit_code(), wtexport::EXIT_BAD_OPTIONS);
    assert!(!options.output.exists());
}

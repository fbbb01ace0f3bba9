//! Per-archive index. Each source WAD is scanned once, up front, in to an
//! [`ArchiveIndex`] which is never modified afterwards.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};
use wad::WadData;
use wad::animated::{Animated, AnimatedKind};
use wad::lumps::{PatchNames, TextureFormat, TextureList};
use wad::switches::Switches;
use wad::texture_set::TextureSet;

use crate::ExportError;
use crate::tables::ANIM_DEFS;

/// Every name in one animation cycle, in order. All names in the cycle share
/// the one allocation.
pub type Chain = Rc<[String]>;

/// Which of the optional tables to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub animated: bool,
    pub switches: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            animated: true,
            switches: true,
        }
    }
}

/// A namespace and the marker prefix used by editors that predate it
struct Namespace {
    name: &'static str,
    alternate: Option<&'static str>,
    /// Sub-markers such as `P1_START` inside the namespace start with this
    sub_marker: Option<&'static str>,
}

const PATCHES: [Namespace; 2] = [
    Namespace {
        name: "P",
        alternate: Some("PP"),
        sub_marker: Some("P"),
    },
    Namespace {
        name: "PP",
        alternate: Some("P"),
        sub_marker: Some("P"),
    },
];
const FLATS: [Namespace; 2] = [
    Namespace {
        name: "F",
        alternate: Some("FF"),
        sub_marker: Some("F"),
    },
    Namespace {
        name: "FF",
        alternate: Some("F"),
        sub_marker: Some("F"),
    },
];
const TEXTURES: [Namespace; 1] = [Namespace {
    name: "TX",
    alternate: None,
    sub_marker: None,
}];

/// `P_START`, `P1_END`, `F23_START` and the like
fn is_sub_marker(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
        .is_some_and(|rest| rest == "_START" || rest == "_END")
}

#[derive(Debug)]
pub struct ArchiveIndex {
    path: PathBuf,
    wad: WadData,
    /// `None` if the archive has no `TEXTURE1`
    texture_set: Option<TextureSet>,
    texture_format: TextureFormat,
    /// Names that were in `TEXTURE1`, kept only when there is a `TEXTURE2`
    primary_names: Option<HashSet<String>>,
    patches: HashMap<String, usize>,
    flats: HashMap<String, usize>,
    namespace_textures: HashMap<String, usize>,
    /// Sorted, for finding the span between the two ends of an animation
    texture_order: Vec<String>,
    flat_order: Vec<String>,
    animated_textures: HashMap<String, Chain>,
    animated_flats: HashMap<String, Chain>,
    switch_partners: HashMap<String, String>,
    animated: Animated,
    switches: Switches,
}

impl ArchiveIndex {
    /// Open and scan a WAD file
    pub fn scan_file(path: &Path, options: ScanOptions) -> Result<Self, ExportError> {
        info!("Scanning {:?}...", path);
        let wad = WadData::open(path).map_err(|source| ExportError::ArchiveOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Self::scan(path, wad, options)
    }

    /// Scan a WAD already in memory. `path` is used for messages only.
    pub fn scan(path: &Path, wad: WadData, options: ScanOptions) -> Result<Self, ExportError> {
        let mut index = ArchiveIndex {
            path: path.to_path_buf(),
            wad,
            texture_set: None,
            texture_format: TextureFormat::Doom,
            primary_names: None,
            patches: HashMap::new(),
            flats: HashMap::new(),
            namespace_textures: HashMap::new(),
            texture_order: Vec::new(),
            flat_order: Vec::new(),
            animated_textures: HashMap::new(),
            animated_flats: HashMap::new(),
            switch_partners: HashMap::new(),
            animated: Animated::default(),
            switches: Switches::default(),
        };

        index.scan_textures()?;

        index.patches = index.scan_namespaces(&PATCHES)?;
        info!("    {} patches.", index.patches.len());
        index.flats = index.scan_namespaces(&FLATS)?;
        info!("    {} flats.", index.flats.len());
        index.namespace_textures = index.scan_namespaces(&TEXTURES)?;
        info!("    {} namespace textures.", index.namespace_textures.len());

        let mut texture_order: Vec<String> = index.namespace_textures.keys().cloned().collect();
        if let Some(set) = &index.texture_set {
            texture_order.extend(set.names().map(str::to_owned));
        }
        texture_order.sort_unstable();
        texture_order.dedup();
        index.texture_order = texture_order;

        let mut flat_order: Vec<String> = index.flats.keys().cloned().collect();
        flat_order.sort_unstable();
        index.flat_order = flat_order;

        if options.animated {
            index.scan_animated()?;
        }
        if options.switches {
            index.scan_switches()?;
        }

        Ok(index)
    }

    fn malformed(&self, source: wad::WadError) -> ExportError {
        ExportError::MalformedLump {
            archive: self.path.clone(),
            source,
        }
    }

    fn scan_textures(&mut self) -> Result<(), ExportError> {
        let Some(tex1) = self.wad.get_lump("TEXTURE1") else {
            return Ok(());
        };
        info!("    Scanning TEXTUREx/PNAMES...");

        let pnames = self
            .wad
            .get_lump("PNAMES")
            .ok_or_else(|| ExportError::MissingPatchTable {
                archive: self.path.clone(),
            })?;
        let pnames = PatchNames::from_bytes(&pnames.data).map_err(|e| self.malformed(e))?;
        info!("        {} entries in PNAMES.", pnames.len());

        let list1 = TextureList::from_bytes("TEXTURE1", &tex1.data).map_err(|e| self.malformed(e))?;
        info!("        {} entries in TEXTURE1.", list1.len());
        self.texture_format = list1.format;

        let list2 = match self.wad.get_lump("TEXTURE2") {
            Some(tex2) => {
                let list2 = TextureList::from_bytes("TEXTURE2", &tex2.data)
                    .map_err(|e| self.malformed(e))?;
                info!("        {} entries in TEXTURE2.", list2.len());
                Some(list2)
            }
            None => None,
        };

        let set = match &list2 {
            Some(list2) => {
                self.primary_names = Some(list1.textures.iter().map(|t| t.name.clone()).collect());
                TextureSet::from_lumps(&pnames, &[&list1, list2])
            }
            None => TextureSet::from_lumps(&pnames, &[&list1]),
        }
        .map_err(|e| self.malformed(e))?;
        self.texture_set = Some(set);
        Ok(())
    }

    /// Both `P_START`..`P_END` and `PP_START`..`PP_END` may be present in
    /// one archive; entries from either land in the same map.
    fn scan_namespaces(
        &self,
        namespaces: &[Namespace],
    ) -> Result<HashMap<String, usize>, ExportError> {
        let mut map = HashMap::new();
        for ns in namespaces {
            self.scan_namespace(ns, &mut map)?;
        }
        Ok(map)
    }

    /// Map every entry between `<NS>_START` and the first `<NS>_END` after
    /// it. If the usual marker is missing the alternate is tried instead,
    /// independently for each end.
    fn scan_namespace(
        &self,
        ns: &Namespace,
        map: &mut HashMap<String, usize>,
    ) -> Result<(), ExportError> {
        let find = |suffix: &str, from: usize| {
            self.wad
                .find_lump_index_from(&format!("{}_{suffix}", ns.name), from)
                .map(|i| (i, ns.name))
                .or_else(|| {
                    ns.alternate.and_then(|alt| {
                        self.wad
                            .find_lump_index_from(&format!("{alt}_{suffix}"), from)
                            .map(|i| (i, alt))
                    })
                })
        };

        let Some((start, start_ns)) = find("START", 0) else {
            return Ok(());
        };
        let Some((end, end_ns)) = find("END", start + 1) else {
            return Err(ExportError::UnterminatedNamespace {
                archive: self.path.clone(),
                namespace: start_ns.to_owned(),
            });
        };
        if start_ns != end_ns {
            warn!(
                "{:?}: {start_ns}_START is closed by {end_ns}_END",
                self.path
            );
        }

        for i in start + 1..end {
            let Some(lump) = self.wad.lump(i) else {
                break;
            };
            if ns.sub_marker.is_some_and(|p| is_sub_marker(&lump.name, p)) {
                continue;
            }
            map.insert(lump.name.clone(), i);
        }
        Ok(())
    }

    fn scan_animated(&mut self) -> Result<(), ExportError> {
        if let Some(lump) = self.wad.get_lump("ANIMATED") {
            info!("    Scanning ANIMATED...");
            self.animated = Animated::from_bytes(&lump.data).map_err(|e| self.malformed(e))?;
        }

        for entry in &self.animated.entries {
            let (order, map) = match entry.kind {
                AnimatedKind::Texture => (&self.texture_order, &mut self.animated_textures),
                AnimatedKind::Flat => (&self.flat_order, &mut self.animated_flats),
            };
            if let Some(chain) = find_chain(order, &entry.first_name, &entry.last_name) {
                add_chain(map, chain);
            }
        }

        // Built-in cycles go in last and take over any name they cover
        for def in ANIM_DEFS.iter() {
            let (order, map) = if def.is_texture {
                (&self.texture_order, &mut self.animated_textures)
            } else {
                (&self.flat_order, &mut self.animated_flats)
            };
            if let Some(chain) = find_chain(order, def.start_name, def.end_name) {
                add_chain(map, chain);
            }
        }
        debug!(
            "{:?}: {} animated textures, {} animated flats",
            self.path,
            self.animated_textures.len(),
            self.animated_flats.len()
        );
        Ok(())
    }

    fn scan_switches(&mut self) -> Result<(), ExportError> {
        let Some(lump) = self.wad.get_lump("SWITCHES") else {
            return Ok(());
        };
        info!("    Scanning SWITCHES...");
        self.switches = Switches::from_bytes(&lump.data).map_err(|e| self.malformed(e))?;
        for entry in &self.switches.entries {
            self.switch_partners
                .insert(entry.off_name.clone(), entry.on_name.clone());
            self.switch_partners
                .insert(entry.on_name.clone(), entry.off_name.clone());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn texture_set(&self) -> Option<&TextureSet> {
        self.texture_set.as_ref()
    }

    /// True if this archive's `TEXTURE1` uses the Strife layout
    pub fn is_strife_format(&self) -> bool {
        self.texture_format == TextureFormat::Strife
    }

    pub fn texture_format(&self) -> TextureFormat {
        self.texture_format
    }

    /// `Some` only if the archive has a `TEXTURE2`: the names in `TEXTURE1`
    pub fn primary_names(&self) -> Option<&HashSet<String>> {
        self.primary_names.as_ref()
    }

    pub fn defines_texture(&self, name: &str) -> bool {
        self.texture_set.as_ref().is_some_and(|s| s.contains(name))
    }

    fn lump_data(&self, index: Option<&usize>) -> Option<&[u8]> {
        index
            .and_then(|i| self.wad.lump(*i))
            .map(|l| l.data.as_slice())
    }

    pub fn has_patch(&self, name: &str) -> bool {
        self.patches.contains_key(name)
    }

    pub fn patch_data(&self, name: &str) -> Option<&[u8]> {
        self.lump_data(self.patches.get(name))
    }

    pub fn has_flat(&self, name: &str) -> bool {
        self.flats.contains_key(name)
    }

    pub fn flat_data(&self, name: &str) -> Option<&[u8]> {
        self.lump_data(self.flats.get(name))
    }

    pub fn has_namespace_texture(&self, name: &str) -> bool {
        self.namespace_textures.contains_key(name)
    }

    pub fn namespace_texture_data(&self, name: &str) -> Option<&[u8]> {
        self.lump_data(self.namespace_textures.get(name))
    }

    pub fn texture_chain(&self, name: &str) -> Option<&[String]> {
        self.animated_textures.get(name).map(|c| &**c)
    }

    pub fn flat_chain(&self, name: &str) -> Option<&[String]> {
        self.animated_flats.get(name).map(|c| &**c)
    }

    pub fn switch_partner(&self, name: &str) -> Option<&str> {
        self.switch_partners.get(name).map(String::as_str)
    }

    /// This archive's own `ANIMATED` entries
    pub fn animated(&self) -> &Animated {
        &self.animated
    }

    /// This archive's own `SWITCHES` entries
    pub fn switches(&self) -> &Switches {
        &self.switches
    }
}

/// The inclusive run of names between `first` and `last` in `order`, which
/// must be sorted. `None` if either end is missing.
fn find_chain(order: &[String], first: &str, last: &str) -> Option<Chain> {
    let a = order.binary_search_by(|n| n.as_str().cmp(first)).ok()?;
    let b = order.binary_search_by(|n| n.as_str().cmp(last)).ok()?;
    Some(Rc::from(&order[a.min(b)..=a.max(b)]))
}

fn add_chain(map: &mut HashMap<String, Chain>, chain: Chain) {
    for name in chain.iter() {
        map.insert(name.clone(), chain.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_wads::TestWad;
    use wad::animated::AnimatedEntry;
    use wad::switches::SwitchEntry;
    use wad::texture_set::Texture;

    fn scan(wad: WadData) -> Result<ArchiveIndex, ExportError> {
        ArchiveIndex::scan(Path::new("test.wad"), wad, ScanOptions::default())
    }

    #[test]
    fn sub_markers() {
        assert!(is_sub_marker("P1_START", "P"));
        assert!(is_sub_marker("P23_END", "P"));
        assert!(is_sub_marker("P_START", "P"));
        assert!(!is_sub_marker("PP_START", "P"));
        assert!(!is_sub_marker("P1WALL", "P"));
        assert!(is_sub_marker("F2_END", "F"));
    }

    #[test]
    fn indexes_namespaces() {
        let wad = TestWad::new()
            .textures(&[Texture::new("DOOR3", 64, 72).with_patch("DOOR01", 0, 0)])
            .namespace("P", &[("P1_START", ""), ("DOOR01", "door"), ("P1_END", "")])
            .namespace("FF", &[("NUKAGE1", "n1"), ("NUKAGE2", "n2")])
            .namespace("TX", &[("FREETEX", "free")])
            .build();
        let index = scan(wad).unwrap();

        assert!(index.defines_texture("DOOR3"));
        assert_eq!(index.patch_data("DOOR01"), Some(&b"door"[..]));
        assert!(!index.has_patch("P1_START"));
        assert_eq!(index.flat_data("NUKAGE2"), Some(&b"n2"[..]));
        assert!(index.has_namespace_texture("FREETEX"));
        assert_eq!(index.texture_order, vec!["DOOR3", "FREETEX"]);
        assert_eq!(index.flat_order, vec!["NUKAGE1", "NUKAGE2"]);
        assert!(index.primary_names().is_none());
        assert!(!index.is_strife_format());
    }

    #[test]
    fn mismatched_markers_are_accepted() {
        let wad = TestWad::new()
            .lump("P_START", b"")
            .lump("WALL01", b"wall")
            .lump("PP_END", b"")
            .build();
        let index = scan(wad).unwrap();
        assert!(index.has_patch("WALL01"));
    }

    #[test]
    fn unterminated_namespace() {
        let wad = TestWad::new()
            .lump("F_START", b"")
            .lump("FLAT1", b"flat")
            .build();
        match scan(wad) {
            Err(ExportError::UnterminatedNamespace { namespace, .. }) => {
                assert_eq!(namespace, "F")
            }
            other => panic!("expected UnterminatedNamespace, got {other:?}"),
        }
    }

    #[test]
    fn texture_without_pnames() {
        let wad = TestWad::new()
            .lump("TEXTURE1", &TextureList::new(TextureFormat::Doom).to_bytes().unwrap())
            .build();
        assert!(matches!(
            scan(wad),
            Err(ExportError::MissingPatchTable { .. })
        ));
    }

    #[test]
    fn both_patch_namespaces() {
        let wad = TestWad::new()
            .namespace("P", &[("WALL01", "a")])
            .namespace("PP", &[("WALL02", "b")])
            .build();
        let index = scan(wad).unwrap();
        assert!(index.has_patch("WALL01"));
        assert!(index.has_patch("WALL02"));
    }

    #[test]
    fn animated_chains_from_own_lump() {
        let wad = TestWad::new()
            .namespace(
                "TX",
                &[("GLOW1", "1"), ("GLOW2", "2"), ("GLOW3", "3"), ("OTHER", "4")],
            )
            .animated(&[
                AnimatedEntry::texture("GLOW3", "GLOW1", 4, false),
                // One end missing, skipped
                AnimatedEntry::texture("GONE2", "GLOW1", 4, false),
            ])
            .build();
        let index = scan(wad).unwrap();
        let chain = index.texture_chain("GLOW2").unwrap();
        assert_eq!(chain, ["GLOW1", "GLOW2", "GLOW3"]);
        assert_eq!(index.texture_chain("GLOW1"), Some(chain));
        assert!(index.texture_chain("OTHER").is_none());
        assert_eq!(index.animated().len(), 2);
    }

    #[test]
    fn builtin_chains_fill_in() {
        let wad = TestWad::new()
            .namespace(
                "F",
                &[("NUKAGE1", "1"), ("NUKAGE2", "2"), ("NUKAGE3", "3")],
            )
            .build();
        let index = scan(wad).unwrap();
        assert_eq!(
            index.flat_chain("NUKAGE1").unwrap(),
            ["NUKAGE1", "NUKAGE2", "NUKAGE3"]
        );
        // Built-in cycles are not part of the archive's own table
        assert!(index.animated().is_empty());
    }

    #[test]
    fn builtin_chains_replace_own() {
        let wad = TestWad::new()
            .namespace(
                "F",
                &[("NUKAGE1", "1"), ("NUKAGE2", "2"), ("NUKAGE3", "3")],
            )
            .animated(&[AnimatedEntry::flat("NUKAGE2", "NUKAGE1", 8)])
            .build();
        let index = scan(wad).unwrap();
        assert_eq!(
            index.flat_chain("NUKAGE1").unwrap(),
            ["NUKAGE1", "NUKAGE2", "NUKAGE3"]
        );
        assert_eq!(index.flat_chain("NUKAGE2"), index.flat_chain("NUKAGE3"));
        // The archive's own table is left as it was
        assert_eq!(index.animated().len(), 1);
    }

    #[test]
    fn animation_disabled() {
        let wad = TestWad::new()
            .namespace("F", &[("LAVA1", "1"), ("LAVA4", "4")])
            .switches(&[SwitchEntry::new("SW1X", "SW2X", 1)])
            .build();
        let index = ArchiveIndex::scan(
            Path::new("test.wad"),
            wad,
            ScanOptions {
                animated: false,
                switches: false,
            },
        )
        .unwrap();
        assert!(index.flat_chain("LAVA1").is_none());
        assert!(index.switch_partner("SW1X").is_none());
    }

    #[test]
    fn switch_partners_both_ways() {
        let wad = TestWad::new()
            .switches(&[SwitchEntry::new("SW1X", "SW2X", 1)])
            .build();
        let index = scan(wad).unwrap();
        assert_eq!(index.switch_partner("SW1X"), Some("SW2X"));
        assert_eq!(index.switch_partner("SW2X"), Some("SW1X"));
    }

    #[test]
    fn secondary_list_remembers_primary_names() {
        let wad = TestWad::new()
            .textures_split(
                &[Texture::new("T1", 8, 8).with_patch("P", 0, 0)],
                &[Texture::new("T2", 8, 8).with_patch("P", 0, 0)],
            )
            .build();
        let index = scan(wad).unwrap();
        let primary = index.primary_names().unwrap();
        assert!(primary.contains("T1"));
        assert!(!primary.contains("T2"));
        assert!(index.defines_texture("T2"));
    }

    #[test]
    fn malformed_animated() {
        let wad = TestWad::new().lump("ANIMATED", b"\x01\x02\x03").build();
        assert!(matches!(scan(wad), Err(ExportError::MalformedLump { .. })));
    }
}

use folio_core::persist::{load_index, save_index, to_json};
use folio_core::scores::{BODY_WEIGHT, SECTION_TITLE_WEIGHT, TITLE_WEIGHT};
use folio_core::{BuildConfig, BuildContext, Encoding, PageInput, Registry, ScoreMap, SearchIndex, WordIndex};
use std::collections::HashSet;
use tempfile::tempdir;

fn flat_words(index: &SearchIndex) -> &std::collections::BTreeMap<String, usize> {
    match &index.words {
        WordIndex::Flat(words) => words,
        WordIndex::Nested(_) => panic!("expected flat encoding"),
    }
}

fn corpus() -> (Registry, ScoreMap) {
    let mut reg = Registry::new();
    let mut scores = ScoreMap::new();
    let pages = [
        ("Spanish Olympiad in Informatics", "awards/oie", 30, "Gold Medal in the 2019 edition, silver in 2018 and 2020"),
        ("Catalan Olympiad in Informatics", "awards/oicat", 30, "Gold Medal in the 2018, 2019 and 2020 editions"),
        ("Tech Scouts: Computer Science", "education/tech_scouts", 40, "Intensive summer course on algorithms and data structures"),
        ("Private Tutor", "work/tutoring", 50, "Taught algorithms, data structures and memory management"),
    ];
    for (title, path, priority, body) in pages {
        let id = reg.register_page(title, path, priority);
        scores.accumulate(id, title, TITLE_WEIGHT);
        scores.accumulate(id, body, BODY_WEIGHT);
    }
    let sec = reg.register_section(1, "medals", "Gold Medals").unwrap();
    scores.accumulate(sec, "Gold Medals", SECTION_TITLE_WEIGHT);
    (reg, scores)
}

#[test]
fn end_to_end_single_document() {
    let mut reg = Registry::new();
    let id = reg.register_page("Alpha Beta", "/x", 10);
    let mut scores = ScoreMap::new();
    scores.accumulate(id, "Alpha Beta", TITLE_WEIGHT);

    let (index, _) = SearchIndex::build(&reg, &scores, 20, Encoding::Flat);
    assert!(index.score_confs.contains(&vec![0]));
    for word in ["alpha", "beta"] {
        for end in 1..=word.len() {
            assert_eq!(index.lookup(&word[..end]), &[0], "prefix {:?}", &word[..end]);
        }
    }
    assert!(index.lookup("").contains(&0));
}

#[test]
fn every_prefix_of_every_token_is_addressable() {
    let (reg, scores) = corpus();
    let (index, _) = SearchIndex::build(&reg, &scores, 20, Encoding::Flat);
    let words = flat_words(&index);
    for (token, _) in scores.iter() {
        for end in 1..=token.len() {
            let prefix = &token[..end];
            assert!(words.contains_key(prefix), "missing prefix {prefix:?}");
            assert!(!index.lookup(prefix).is_empty());
        }
    }
}

#[test]
fn result_lists_are_deduplicated() {
    let (reg, scores) = corpus();
    let (index, stats) = SearchIndex::build(&reg, &scores, 20, Encoding::Flat);
    let distinct: HashSet<&Vec<u32>> = index.score_confs.iter().collect();
    assert_eq!(distinct.len(), index.score_confs.len());
    assert_eq!(stats.slots, index.score_confs.len());

    // Every prefix of "scouts" past "sc" resolves to the same single page.
    let words = flat_words(&index);
    assert_eq!(words["scouts"], words["sco"]);
    assert!(index.score_confs.len() < words.len());
}

#[test]
fn result_lists_respect_the_cap() {
    let (reg, scores) = corpus();
    let (index, _) = SearchIndex::build(&reg, &scores, 2, Encoding::Flat);
    assert!(index.score_confs.iter().all(|list| list.len() <= 2));
    assert_eq!(index.lookup(""), &[3, 2]);
}

#[test]
fn title_matches_outrank_body_matches() {
    let (reg, scores) = corpus();
    let (index, _) = SearchIndex::build(&reg, &scores, 20, Encoding::Flat);
    assert_eq!(index.lookup("tutor")[0], 3);
    // The section heading beats the pages that mention gold in passing.
    assert_eq!(index.lookup("gold")[0], 4);
}

#[test]
fn serialization_is_deterministic() {
    let build = || {
        let (reg, scores) = corpus();
        let (index, _) = SearchIndex::build(&reg, &scores, 20, Encoding::Flat);
        to_json(&index).unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn artifact_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/search.json");
    let (reg, scores) = corpus();
    let (index, _) = SearchIndex::build(&reg, &scores, 20, Encoding::Nested);
    save_index(&path, &index).unwrap();
    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded, index);
    assert_eq!(loaded.lookup("olymp"), index.lookup("olymp"));
}

#[test]
fn pipeline_runs_are_byte_identical() {
    let run = || {
        let mut ctx = BuildContext::new(BuildConfig::default());
        for (path, title, body) in [
            ("index", "Vicent Baeza", r#"<p>Software Engineer. <a href="work">Work</a> <a href="awards">Awards</a></p>"#),
            ("work", "Work", r#"<h2 id="ai">AI Engineer</h2><p>Automation tools</p>"#),
            ("awards", "Awards", r#"<h2 id="oie">OIE</h2><p>Gold medal</p><h2 id="ioi">IOI</h2><p>Spanish team</p>"#),
        ] {
            ctx.add_page(PageInput { path: path.into(), title: title.into(), body: body.into(), ..PageInput::default() });
        }
        let out = ctx.finish();
        (to_json(&out.index).unwrap(), out.warnings.report())
    };
    let (first, report) = run();
    assert_eq!(first, run().0);
    assert_eq!(report, "Pages successfully built!\n✅ No warnings\n");
}

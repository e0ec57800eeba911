use nenpo_seika::batch::{read_batch, UserRequest};
use nenpo_seika::classify::ReportCategory;
use nenpo_seika::normalize::Lang;
use nenpo_seika::pipeline::{build_bibliography, collect, load_dump};
use nenpo_seika::source::StaticSource;
use nenpo_seika::Result;
use serde_json::json;

fn kuga_source() -> StaticSource {
    let mut source = StaticSource::new();
    source.insert(
        "tkuga",
        "profile",
        json!({"family_name": {"en": "Kuga", "ja": "空閑"}, "given_name": {"en": "Taro", "ja": "太郎"}}),
    );
    source.insert(
        "tkuga",
        "published_papers",
        json!({"items": [
            {
                "rm:id": "100",
                "referee": true,
                "authors": {"en": [{"name": "Smith, John"}]},
                "paper_title": {"en": "X"},
                "publication_date": "2020-05"
            },
            {
                "rm:id": "101",
                "referee": true,
                "invited": true,
                "published_paper_type": "scientific_journal",
                "authors": {"en": [{"name": "Kuga, Taro"}, {"name": "Sato, Hanako"}]},
                "paper_title": {"en": "Invited Survey"},
                "publication_name": {"en": "Journal of Surveys"},
                "volume": "3",
                "number": "2",
                "starting_page": "10",
                "ending_page": "20",
                "publication_date": "2021-01-15"
            },
            {
                "rm:id": "102",
                "referee": true,
                "published_paper_type": "scientific_journal",
                "paper_title": {"en": "Solo Paper"},
                "publication_name": {"en": "Letters"},
                "ending_page": "99",
                "publication_date": "2021"
            }
        ]}),
    );
    source.insert(
        "tkuga",
        "industrial_property_rights",
        json!({"items": [
            {
                "rm:id": "200",
                "industrial_property_right_type": "patent_right",
                "inventors": {"ja": [{"name": "空閑 太郎"}]},
                "industrial_property_right_title": {"ja": "装置"},
                "application_number": "2020-000001",
                "registration_date": "2021-02-03"
            },
            {
                "rm:id": "201",
                "industrial_property_right_type": "design_right",
                "industrial_property_right_title": {"en": "Design"},
                "registration_date": "2021-02-03"
            },
            {
                "rm:id": "202",
                "industrial_property_right_title": {"en": "Untyped"}
            }
        ]}),
    );
    source.insert(
        "tkuga",
        "presentations",
        json!({"items": [
            {
                "rm:id": "300",
                "invited": true,
                "presenters": {"en": [{"name": "Kuga, Taro"}]},
                "presentation_title": {"en": "Keynote"},
                "event": {"en": "Conf"},
                "publication_date": "2020-11-02"
            }
        ]}),
    );
    source
}

fn user(user_id: &str) -> UserRequest {
    UserRequest {
        user_id: user_id.to_string(),
        lang: Lang::En,
        range: None,
    }
}

#[tokio::test]
async fn refereed_paper_without_type_lands_in_peer_reviewed_block() -> Result<()> {
    let bib = build_bibliography(&kuga_source(), &[user("tkuga")]).await?;

    let block = bib.block(ReportCategory::PeerReviewed).expect("peer-reviewed block");
    assert_eq!(block.count(), 1);
    assert_eq!(block.entries[0].label, "tkuga100");
    assert_eq!(block.entries[0].text, "John Smith, X, May, 2020.");
    Ok(())
}

#[tokio::test]
async fn invited_wins_over_journal_type() -> Result<()> {
    let bib = build_bibliography(&kuga_source(), &[user("tkuga")]).await?;

    let invited = bib.block(ReportCategory::InvitedPaper).expect("invited block");
    assert_eq!(
        invited.entries[0].text,
        "Taro Kuga, Hanako Sato, Invited Survey, Journal of Surveys, 3, 2, pp10-20, 15 Jan, 2021."
    );

    let journal = bib.block(ReportCategory::JournalPaper).expect("journal block");
    // no authors on record, lone ending page dropped
    assert_eq!(journal.entries[0].text, "Taro Kuga, Solo Paper, Letters, 2021.");
    Ok(())
}

#[tokio::test]
async fn only_patent_rights_are_counted() -> Result<()> {
    let bib = build_bibliography(&kuga_source(), &[user("tkuga")]).await?;

    let patents = bib.block(ReportCategory::Patent).expect("patent block");
    assert_eq!(patents.count(), 1);
    assert_eq!(patents.entries[0].label, "tkuga200");
    assert_eq!(patents.entries[0].text, "空閑 太郎, 装置, 2020-000001, 3 Feb, 2021.");

    let all_labels: Vec<&str> = bib
        .blocks
        .iter()
        .flat_map(|b| b.entries.iter().map(|e| e.label.as_str()))
        .collect();
    assert!(!all_labels.contains(&"tkuga201"));
    assert!(!all_labels.contains(&"tkuga202"));
    Ok(())
}

#[tokio::test]
async fn headers_count_rendered_entries() -> Result<()> {
    let bib = build_bibliography(&kuga_source(), &[user("tkuga")]).await?;
    let latex = bib.to_string();

    for block in &bib.blocks {
        let header = format!("\\begin{{{}}}{{{}}}", block.category.label(), block.count());
        assert!(latex.contains(&header), "missing header {}", header);
    }
    assert_eq!(latex.matches("\\bibitem{").count(), bib.entry_count());

    let order: Vec<ReportCategory> = bib.blocks.iter().map(|b| b.category).collect();
    assert_eq!(
        order,
        [
            ReportCategory::PeerReviewed,
            ReportCategory::JournalPaper,
            ReportCategory::InvitedTalk,
            ReportCategory::InvitedPaper,
            ReportCategory::Patent,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn batch_range_and_language_apply_per_user() -> Result<()> {
    let mut source = kuga_source();
    source.insert("hsato", "profile", json!({"family_name": {"ja": "佐藤"}, "given_name": {"ja": "花子"}}));
    source.insert(
        "hsato",
        "books_etc",
        json!({"items": [
            {"rm:id": "1", "book_title": {"ja": "本"}, "publisher": {"ja": "出版社"}, "publication_date": "2021-10"}
        ]}),
    );

    let requests = read_batch("tkuga, en, 2021/1/1, 2021/12/31\nhsato, ja\n".as_bytes())?;
    let items = collect(&source, &requests).await?;
    let ids: Vec<&str> = items.iter().filter_map(|i| i.info.rm_id.as_deref()).collect();
    // 2020 items of tkuga fall outside the period; the design right stays (no category yet)
    assert_eq!(ids, ["101", "102", "200", "201", "1"]);

    let bib = build_bibliography(&source, &requests).await?;
    let books = bib.block(ReportCategory::Book).expect("book block");
    assert_eq!(books.entries[0].text, "花子 佐藤, 本, 出版社, 2021年10月.");
    Ok(())
}

#[tokio::test]
async fn dump_renders_offline() -> Result<()> {
    let dump = json!([
        {
            "user_id": "tkuga",
            "records": {
                "profile": {"family_name": {"en": "Kuga"}, "given_name": {"en": "Taro"}},
                "works": {"items": [
                    {"rm:id": "9", "work_title": {"en": "Tool"}, "url": "https://example.org", "from_date": "2022-04-01"}
                ]},
                "media_coverage": {"items": [
                    {"rm:id": "8", "media_coverage_title": {"en": "Interview"}, "publisher": {"en": "Daily"}, "publication_date": "2022-05"}
                ]}
            }
        }
    ]);
    let (source, requests) = load_dump(&dump.to_string())?;
    let latex = build_bibliography(&source, &requests).await?.to_string();

    assert_eq!(
        latex,
        "\\begin{公開}{1}\n\\bibitem{tkuga9}\nTaro Kuga, Tool, https://example.org, 1 Apr, 2022.\n\n\\end{公開}\n\n\
         \\begin{報道}{1}\n\\bibitem{tkuga8}\nTaro Kuga, Interview, Daily, May, 2022.\n\n\\end{報道}\n\n"
    );
    Ok(())
}

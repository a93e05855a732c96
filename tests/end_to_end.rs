use std::fs;
use std::path::Path;

use community_features::config::{ColumnNames, FeatureSettings, SplitSettings};
use community_features::database::{self, features, matrices};
use community_features::services::{FeatureJob, ProcessingService, SplitService, TopNService};

const REVIEWS: &str = "\
review_id,user_id,business_id,rating,date
r1,u1,b1,5,2018-01-01
r2,u2,b1,3,2018-01-02
r3,u3,b1,4,2018-01-03
r4,u1,b2,2,2019-06-01
";

const PARTITION: &str = r#"{"u1": "A", "u2": "A", "u3": "B"}"#;

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let reviews = dir.join("reviews.csv");
    let partition = dir.join("partition.json");
    fs::write(&reviews, REVIEWS).unwrap();
    fs::write(&partition, PARTITION).unwrap();
    (reviews, partition)
}

fn settings() -> FeatureSettings {
    FeatureSettings {
        date_cutoff: "2018-12-31".parse().unwrap(),
        min_community_size: 2,
        min_community_visitors: 1,
        ..FeatureSettings::default()
    }
}

#[test]
fn test_features_are_written_to_csv_and_database() {
    let dir = tempfile::tempdir().unwrap();
    let (reviews, partition) = write_inputs(dir.path());
    let output = dir.path().join("features.csv");
    let db_path = dir.path().join("features.db");

    let job = FeatureJob {
        reviews,
        partition,
        output: output.clone(),
        database: Some(db_path.clone()),
        cache_dir: None,
        refresh_cache: false,
    };
    let report = ProcessingService::new(settings(), job).unwrap().run().unwrap();

    assert_eq!(report.rows, 4);
    assert_eq!(report.businesses, 1);
    assert!(!report.matrices_from_cache);

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "review_id,user_id,business_id,rating,date,community,community_mean_rating,community_percentage_of_visits\n\
         r1,u1,b1,5,2018-01-01,A,4,1\n\
         r2,u2,b1,3,2018-01-02,A,4,1\n\
         r3,u3,b1,4,2018-01-03,B,4,1\n\
         r4,u1,b2,2,2019-06-01,A,,\n"
    );

    assert!(!db_path.with_extension("tmp").exists());
    let pool = database::create_pool(&db_path).unwrap();
    let mut conn = database::get_connection(&pool).unwrap();

    assert_eq!(features::count(&mut conn).unwrap(), 4);
    let stored = features::list_by_business(&mut conn, "b1").unwrap();
    let resolutions: Vec<&str> = stored.iter().map(|row| row.resolution.as_str()).collect();
    assert_eq!(resolutions, vec!["community", "community", "global"]);
    assert!(features::list_by_business(&mut conn, "b2").unwrap()[0]
        .community_mean_rating
        .is_none());

    let cells = matrices::list_by_business(&mut conn, "b1").unwrap();
    let labels: Vec<Option<&str>> = cells.iter().map(|cell| cell.community.as_deref()).collect();
    assert_eq!(labels, vec![None, Some("A"), Some("B")]);
    assert_eq!(cells[0].visit_count, 3);
    assert_eq!(cells[0].date_cutoff, "2018-12-31");
}

#[test]
fn test_second_run_reuses_cached_matrices() {
    let dir = tempfile::tempdir().unwrap();
    let (reviews, partition) = write_inputs(dir.path());

    let job = FeatureJob {
        reviews,
        partition,
        output: dir.path().join("features.csv"),
        database: None,
        cache_dir: Some(dir.path().join("cache")),
        refresh_cache: false,
    };

    let first = ProcessingService::new(settings(), job.clone()).unwrap().run().unwrap();
    let first_output = fs::read_to_string(&job.output).unwrap();
    let second = ProcessingService::new(settings(), job.clone()).unwrap().run().unwrap();

    assert!(!first.matrices_from_cache);
    assert!(second.matrices_from_cache);
    assert_eq!(fs::read_to_string(&job.output).unwrap(), first_output);

    let refreshed = ProcessingService::new(
        settings(),
        FeatureJob {
            refresh_cache: true,
            ..job
        },
    )
    .unwrap()
    .run()
    .unwrap();
    assert!(!refreshed.matrices_from_cache);
}

#[test]
fn test_edited_partition_is_not_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let (reviews, partition) = write_inputs(dir.path());
    let cached = FeatureJob {
        reviews,
        partition: partition.clone(),
        output: dir.path().join("cached.csv"),
        database: None,
        cache_dir: Some(dir.path().join("cache")),
        refresh_cache: false,
    };
    ProcessingService::new(settings(), cached.clone()).unwrap().run().unwrap();

    fs::write(&partition, r#"{"u1": "A", "u2": "A", "u3": "A"}"#).unwrap();
    let report = ProcessingService::new(settings(), cached.clone()).unwrap().run().unwrap();

    let fresh = FeatureJob {
        output: dir.path().join("fresh.csv"),
        cache_dir: None,
        ..cached.clone()
    };
    ProcessingService::new(settings(), fresh.clone()).unwrap().run().unwrap();

    assert!(!report.matrices_from_cache);
    let cached_out = fs::read_to_string(&cached.output).unwrap();
    assert_eq!(cached_out, fs::read_to_string(&fresh.output).unwrap());
    assert!(cached_out.contains("r3,u3,b1,4,2018-01-03,A,4,1\n"));
}

#[test]
fn test_unknown_user_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (reviews, partition) = write_inputs(dir.path());
    fs::write(&partition, r#"{"u1": "A", "u2": "A"}"#).unwrap();

    let job = FeatureJob {
        reviews,
        partition,
        output: dir.path().join("features.csv"),
        database: None,
        cache_dir: None,
        refresh_cache: false,
    };
    let err = ProcessingService::new(settings(), job).unwrap().run().unwrap_err();

    assert!(format!("{:#}", err).contains("u3"));
}

#[test]
fn test_split_writes_three_chronological_files() {
    let dir = tempfile::tempdir().unwrap();
    let reviews = dir.path().join("reviews.csv");
    let mut log = String::from("user_id,business_id,rating,date\n");
    for day in [5, 1, 9, 3, 7, 2, 8, 4, 6, 10] {
        log.push_str(&format!("u{day},b1,3,2018-01-{day:02}\n"));
    }
    fs::write(&reviews, log).unwrap();

    let out_dir = dir.path().join("split");
    let report = SplitService::new(SplitSettings::default(), ColumnNames::default())
        .unwrap()
        .run(&reviews, &out_dir)
        .unwrap();

    assert_eq!((report.train, report.validation, report.test), (7, 1, 2));
    let test = fs::read_to_string(out_dir.join("test.csv")).unwrap();
    assert_eq!(
        test,
        "user_id,business_id,rating,date\nu9,b1,3,2018-01-09\nu10,b1,3,2018-01-10\n"
    );
    let train = fs::read_to_string(out_dir.join("train.csv")).unwrap();
    assert!(train.starts_with("user_id,business_id,rating,date\nu1,b1,3,2018-01-01\n"));
}

#[test]
fn test_top_n_ranks_predictions_per_user() {
    let dir = tempfile::tempdir().unwrap();
    let predictions = dir.path().join("predictions.csv");
    fs::write(
        &predictions,
        "user_id,business_id,true_rating,estimate\n\
         u1,b1,4,3.5\n\
         u1,b2,,4.5\n\
         u1,b3,2,1.0\n\
         u2,b1,5,2.0\n",
    )
    .unwrap();
    let output = dir.path().join("top.csv");

    let users = TopNService::new(2).run(&predictions, &output).unwrap();

    assert_eq!(users, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "user_id,rank,business_id,estimate\n\
         u1,1,b2,4.5\n\
         u1,2,b1,3.5\n\
         u2,1,b1,2.0\n"
    );
}

//! Release pipeline: pick the previous release, compute the next version, publish.
//!
//! Reads releases and commits from the host, classifies commits, runs the increment
//! engine, renders the changelog and creates the release with its assets.

pub mod assets;
pub mod outputs;

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, info};

use crate::changelog::{generate_changelog, generate_summary, group_commits};
use crate::config::ReleaseConfiguration;
use crate::error::{GitHubError, ReleaseError};
use crate::git::{Branch, ConventionalCommit, RawCommit, classify_all};
use crate::github::{NewRelease, Release, ReleaseHost};
use crate::scheme::VersionScheme;
use crate::version::{Clock, IncrementOptions, IncrementType, Version, increment_version};

pub use assets::{AssetSpec, copy_assets, upload_assets};
pub use outputs::{ActionOutputs, write_outputs};

/// Settings for one run, built once at the process boundary.
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// `semver` or `calver`.
    pub versioning: String,
    pub prefix: Option<String>,
    /// Keep producing pre-releases instead of plain versions.
    pub prerelease: bool,
    /// Pipe-delimited increment list; derived from commits when absent.
    pub increment_type: Option<String>,
    pub draft: bool,
    pub config_path: String,
    pub assets: Vec<AssetSpec>,
    /// Commit the release is cut from.
    pub target: String,
    pub branch: Branch,
    pub dry_run: bool,
}

/// Why a run finished without creating a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoReleasableCommits,
    NothingToPromote,
    VersionUnchanged,
    AlreadyReleased,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoReleasableCommits => "no commits require a release",
            Self::NothingToPromote => "no release found to promote",
            Self::VersionUnchanged => "version is unchanged",
            Self::AlreadyReleased => "a release with this version already exists",
        };
        f.write_str(text)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Created {
        previous: Option<Version>,
        version: Version,
        release: Release,
    },
    DryRun {
        previous: Option<Version>,
        version: Version,
        changelog: String,
    },
    Skipped {
        previous: Option<Version>,
        reason: SkipReason,
    },
}

impl ReleaseOutcome {
    pub fn previous(&self) -> Option<&Version> {
        match self {
            Self::Created { previous, .. }
            | Self::DryRun { previous, .. }
            | Self::Skipped { previous, .. } => previous.as_ref(),
        }
    }

    pub fn incremented(&self) -> Option<&Version> {
        match self {
            Self::Created { version, .. } | Self::DryRun { version, .. } => Some(version),
            Self::Skipped { .. } => None,
        }
    }
}

/// The latest existing release and its parsed version.
#[derive(Debug, Clone)]
struct PreviousRelease {
    version: Version,
    release: Release,
}

/// Run the full release pipeline.
pub async fn run_release(
    settings: &ReleaseSettings,
    host: &dyn ReleaseHost,
    clock: &dyn Clock,
) -> Result<ReleaseOutcome, ReleaseError> {
    let scheme = VersionScheme::new(
        &settings.versioning,
        settings.prefix.as_deref(),
        settings.branch.clone(),
    )?;
    info!(
        "Releasing {} versions from {} on branch {}",
        scheme.name(),
        settings.target,
        settings.branch.name()
    );

    let previous = find_previous_release(&scheme, &settings.branch, host).await?;
    let previous_version = previous.as_ref().map(|p| p.version.clone());
    match &previous {
        Some(p) => info!("Previous release: {}", p.release.tag_name),
        None => info!("No previous release found"),
    }

    let raw = collect_commits(
        host,
        previous.as_ref().map(|p| p.release.tag_name.as_str()),
        &settings.target,
    )
    .await?;
    let commits = classify_all(&raw);
    debug!(
        "{} of {} commits follow the conventional format",
        commits.len(),
        raw.len()
    );

    let Some(increments) = resolve_increments(&scheme, settings, &commits)? else {
        info!("Skipping release: {}", SkipReason::NoReleasableCommits);
        return Ok(ReleaseOutcome::Skipped {
            previous: previous_version,
            reason: SkipReason::NoReleasableCommits,
        });
    };
    debug!("Applying increments: {:?}", increments);

    let base = match &previous_version {
        Some(version) => version.clone(),
        None if increments.iter().all(|i| *i == IncrementType::Release) => {
            info!("Skipping release: {}", SkipReason::NothingToPromote);
            return Ok(ReleaseOutcome::Skipped {
                previous: None,
                reason: SkipReason::NothingToPromote,
            });
        }
        None => scheme.initial_version(clock),
    };

    let options = IncrementOptions {
        prerelease: settings.prerelease,
        branch: settings.branch.clone(),
    };
    let version = increment_version(&base, &increments, &options, clock)?;

    if previous_version.as_ref() == Some(&version) {
        info!("Skipping release: {} ({})", SkipReason::VersionUnchanged, version);
        return Ok(ReleaseOutcome::Skipped {
            previous: previous_version,
            reason: SkipReason::VersionUnchanged,
        });
    }
    if let Some(existing) = find_existing_release(host, &version.to_string()).await? {
        info!(
            "Skipping release: {} ({})",
            SkipReason::AlreadyReleased,
            existing.tag_name
        );
        return Ok(ReleaseOutcome::Skipped {
            previous: previous_version,
            reason: SkipReason::AlreadyReleased,
        });
    }

    info!(
        "Version: {} -> {}",
        previous_version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string()),
        version
    );

    let config =
        load_configuration(&scheme, host, &settings.config_path, &settings.target).await?;
    info!(
        "Changelog: {}",
        generate_summary(&group_commits(&scheme, &config, &commits))
    );
    let changelog = generate_changelog(&scheme, &config, &commits);

    if settings.dry_run {
        return Ok(ReleaseOutcome::DryRun {
            previous: previous_version,
            version,
            changelog,
        });
    }

    let prerelease = version.is_prerelease();
    let request = NewRelease {
        tag_name: version.to_string(),
        name: version.to_string(),
        body: changelog,
        draft: settings.draft,
        prerelease,
        make_latest: (!prerelease).to_string(),
        target_commitish: settings.target.clone(),
    };
    let release = host.create_release(&request).await?;
    info!(
        "Created release {}{}",
        release.tag_name,
        release
            .html_url
            .as_ref()
            .map(|url| format!(" ({})", url))
            .unwrap_or_default()
    );

    if let Some(previous) = &previous
        && is_promotion(settings, &increments, &previous.version, &version)
    {
        copy_assets(host, &previous.release, &release).await?;
    }
    upload_assets(host, &release, &settings.assets).await?;

    Ok(ReleaseOutcome::Created {
        previous: previous_version,
        version,
        release,
    })
}

/// Highest release of this scheme, restricted to the branch modifier on release branches.
async fn find_previous_release(
    scheme: &VersionScheme,
    branch: &Branch,
    host: &dyn ReleaseHost,
) -> Result<Option<PreviousRelease>, ReleaseError> {
    let line = branch.modifier().map(|m| format!("{}.", m));
    let mut latest: Option<PreviousRelease> = None;

    for release in host.list_releases().await? {
        // Drafts have no tag to compare against yet.
        if release.draft {
            debug!("Ignoring draft release {}", release.tag_name);
            continue;
        }

        let version = match scheme.parse(&release.tag_name) {
            Ok(version) if version.prefix() == scheme.prefix() => version,
            Ok(_) => {
                debug!("Ignoring release {}: prefix mismatch", release.tag_name);
                continue;
            }
            Err(e) => {
                debug!("Ignoring release {}: {}", release.tag_name, e);
                continue;
            }
        };

        if let Some(line) = &line
            && !version.unprefixed().starts_with(line.as_str())
        {
            debug!("Ignoring release {} outside {}", release.tag_name, branch.name());
            continue;
        }

        let newer = match &latest {
            Some(current) => version.compare(&current.version)? == Ordering::Greater,
            None => true,
        };
        if newer {
            latest = Some(PreviousRelease { version, release });
        }
    }

    Ok(latest)
}

/// A published release tagged `name`, or a draft (which has no tag yet) named `name`.
async fn find_existing_release(
    host: &dyn ReleaseHost,
    name: &str,
) -> Result<Option<Release>, GitHubError> {
    if let Some(release) = host.get_release_by_tag(name).await? {
        return Ok(Some(release));
    }
    host.get_release_by_name(name).await
}

/// Commits since `previous_tag`, or the whole history up to `target`.
async fn collect_commits(
    host: &dyn ReleaseHost,
    previous_tag: Option<&str>,
    target: &str,
) -> Result<Vec<RawCommit>, GitHubError> {
    if let Some(tag) = previous_tag {
        return host.compare_commits(tag, target).await;
    }

    let history = host.list_commits(target).await?;
    let Some(first) = history.last() else {
        return Ok(Vec::new());
    };

    let mut commits = vec![first.clone()];
    commits.extend(host.compare_commits(&first.sha, target).await?);
    Ok(commits)
}

/// Increments to apply, or `None` when nothing calls for a release.
fn resolve_increments(
    scheme: &VersionScheme,
    settings: &ReleaseSettings,
    commits: &[ConventionalCommit],
) -> Result<Option<Vec<IncrementType>>, ReleaseError> {
    let explicit = match settings.increment_type.as_deref() {
        Some(input) => scheme.parse_increment_types(input)?,
        None => Vec::new(),
    };

    let mut increments = if explicit.is_empty() {
        match scheme.determine_increment_type(commits) {
            Some(increment) => vec![increment],
            None => return Ok(None),
        }
    } else {
        explicit
    };

    // Only core bumps get a pre-release in front; an explicit list without one is
    // applied as given.
    let prerelease_increment = scheme.prerelease_increment();
    if settings.prerelease
        && increments.iter().any(|i| i.is_core())
        && !increments.contains(&IncrementType::Release)
        && !increments.contains(&prerelease_increment)
    {
        increments.insert(0, prerelease_increment);
    }

    Ok(Some(increments))
}

/// Repository configuration at `target`, or the scheme default when there is none.
async fn load_configuration(
    scheme: &VersionScheme,
    host: &dyn ReleaseHost,
    path: &str,
    target: &str,
) -> Result<ReleaseConfiguration, ReleaseError> {
    let Some(bytes) = host.get_file_content(path, target).await? else {
        debug!("No configuration at {}, using {} defaults", path, scheme.name());
        return Ok(scheme.default_configuration());
    };

    let content = String::from_utf8(bytes).map_err(|e| GitHubError::InvalidContent {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let mut config = ReleaseConfiguration::from_yaml(path, &content)?;

    if config.categories.is_empty() {
        debug!("{} defines no categories, using {} defaults", path, scheme.name());
        config.categories = scheme.default_configuration().categories;
    }

    Ok(config)
}

/// A pre-release turned into its plain version by an explicit `release` increment.
fn is_promotion(
    settings: &ReleaseSettings,
    increments: &[IncrementType],
    previous: &Version,
    version: &Version,
) -> bool {
    !settings.prerelease
        && increments.contains(&IncrementType::Release)
        && previous.is_prerelease()
        && !version.is_prerelease()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::github::{Asset, MockReleaseHost};
    use crate::version::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn settings() -> ReleaseSettings {
        ReleaseSettings {
            versioning: "semver".to_string(),
            prefix: None,
            prerelease: false,
            increment_type: None,
            draft: false,
            config_path: ".github/release.yml".to_string(),
            assets: Vec::new(),
            target: "abc123".to_string(),
            branch: Branch::from_name("main"),
            dry_run: false,
        }
    }

    fn release(id: u64, tag: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            body: None,
            draft: false,
            prerelease: false,
            target_commitish: None,
            html_url: None,
            upload_url: None,
        }
    }

    fn commits(messages: &[&str]) -> Vec<RawCommit> {
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| RawCommit::new(format!("sha{}", i), *m))
            .collect()
    }

    fn host_with(tags: &[&str], messages: &[&str]) -> MockReleaseHost {
        let releases: Vec<Release> = tags
            .iter()
            .enumerate()
            .map(|(i, t)| release(i as u64 + 1, t))
            .collect();
        let history = commits(messages);

        let mut host = MockReleaseHost::new();
        host.expect_list_releases()
            .returning(move || Ok(releases.clone()));
        host.expect_compare_commits()
            .returning(move |_, _| Ok(history.clone()));
        host.expect_get_file_content().returning(|_, _| Ok(None));
        host.expect_get_release_by_tag().returning(|_| Ok(None));
        host.expect_get_release_by_name().returning(|_| Ok(None));
        host
    }

    fn expect_created(host: &mut MockReleaseHost) {
        host.expect_create_release().returning(|request| {
            let mut created = release(99, &request.tag_name);
            created.prerelease = request.prerelease;
            created.body = Some(request.body.clone());
            Ok(created)
        });
    }

    #[tokio::test]
    async fn test_minor_release_from_feature() {
        let mut host = host_with(
            &["1.2.3", "v9.0.0", "1.1.0", "not-a-version"],
            &["feat: search", "fix: typo"],
        );
        host.expect_create_release()
            .withf(|r| {
                r.tag_name == "1.3.0"
                    && r.name == "1.3.0"
                    && !r.prerelease
                    && r.make_latest == "true"
                    && r.target_commitish == "abc123"
                    && r.body.contains("### New Features\n- Search")
            })
            .times(1)
            .returning(|r| Ok(release(99, &r.tag_name)));

        let outcome = run_release(&settings(), &host, &clock()).await.unwrap();
        assert_eq!(outcome.previous().unwrap().to_string(), "1.2.3");
        assert_eq!(outcome.incremented().unwrap().to_string(), "1.3.0");
        assert!(matches!(outcome, ReleaseOutcome::Created { .. }));
    }

    #[tokio::test]
    async fn test_skips_when_no_commit_requires_release() {
        let host = host_with(&["1.2.3"], &["docs: readme", "chore: deps"]);

        let outcome = run_release(&settings(), &host, &clock()).await.unwrap();
        assert_eq!(
            outcome,
            ReleaseOutcome::Skipped {
                previous: Some(Version::parse_semantic("1.2.3", None).unwrap()),
                reason: SkipReason::NoReleasableCommits,
            }
        );
    }

    #[tokio::test]
    async fn test_prerelease_mode_bumps_existing_prerelease() {
        let mut host = host_with(&["1.3.0-dev.1", "1.2.3"], &["feat: more"]);
        expect_created(&mut host);

        let mut settings = settings();
        settings.prerelease = true;
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();

        assert_eq!(outcome.incremented().unwrap().to_string(), "1.3.0-dev.2");
        match outcome {
            ReleaseOutcome::Created { release, .. } => assert!(release.prerelease),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prerelease_mode_starts_prerelease_from_plain_version() {
        let mut host = host_with(&["1.2.3"], &["feat: more"]);
        expect_created(&mut host);

        let mut settings = settings();
        settings.prerelease = true;
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(outcome.incremented().unwrap().to_string(), "1.3.0-dev.1");
    }

    #[tokio::test]
    async fn test_prerelease_mode_explicit_release_is_unchanged() {
        for previous in ["1.3.0", "1.3.0-rc.2"] {
            let host = host_with(&[previous], &["feat: x"]);

            let mut settings = settings();
            settings.prerelease = true;
            settings.increment_type = Some("release".to_string());
            let outcome = run_release(&settings, &host, &clock()).await.unwrap();
            assert_eq!(
                outcome,
                ReleaseOutcome::Skipped {
                    previous: Some(Version::parse_semantic(previous, None).unwrap()),
                    reason: SkipReason::VersionUnchanged,
                },
                "previous {}",
                previous
            );
        }
    }

    #[tokio::test]
    async fn test_draft_is_not_previous_release() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases().returning(|| {
            let mut draft = release(2, "1.3.0");
            draft.draft = true;
            Ok(vec![release(1, "1.2.0"), draft])
        });
        host.expect_compare_commits()
            .with(eq("1.2.0"), eq("abc123"))
            .times(1)
            .returning(|_, _| Ok(commits(&["fix: x"])));
        host.expect_get_file_content().returning(|_, _| Ok(None));
        host.expect_get_release_by_tag().returning(|_| Ok(None));
        host.expect_get_release_by_name().returning(|_| Ok(None));
        expect_created(&mut host);

        let outcome = run_release(&settings(), &host, &clock()).await.unwrap();
        assert_eq!(outcome.previous().unwrap().to_string(), "1.2.0");
        assert_eq!(outcome.incremented().unwrap().to_string(), "1.2.1");
    }

    #[tokio::test]
    async fn test_release_branch_filters_previous_by_modifier() {
        let mut host = host_with(&["2.0.0", "1.4.0", "1.3.7", "1.3.7-rc.1"], &["feat: backport"]);
        expect_created(&mut host);

        let mut settings = settings();
        settings.branch = Branch::from_name("release/1.3");
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();

        assert_eq!(outcome.previous().unwrap().to_string(), "1.3.7");
        assert_eq!(outcome.incremented().unwrap().to_string(), "1.3.8");
    }

    #[tokio::test]
    async fn test_promotion_copies_assets() {
        let mut host = host_with(&["1.0.0-rc.2"], &[]);
        expect_created(&mut host);
        host.expect_list_assets()
            .with(eq(1))
            .returning(|_| {
                Ok(vec![Asset {
                    id: 5,
                    name: "app.zip".to_string(),
                    label: None,
                    size: 3,
                }])
            });
        host.expect_download_asset()
            .with(eq(5))
            .returning(|_| Ok(b"zip".to_vec()));
        host.expect_upload_asset()
            .withf(|id, name, _, _| *id == 99 && name == "app.zip")
            .times(1)
            .returning(|_, name, label, _| {
                Ok(Asset {
                    id: 6,
                    name: name.to_string(),
                    label,
                    size: 3,
                })
            });

        let mut settings = settings();
        settings.increment_type = Some("release".to_string());
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(outcome.incremented().unwrap().to_string(), "1.0.0");
    }

    #[tokio::test]
    async fn test_promoting_plain_version_is_unchanged() {
        let host = host_with(&["1.0.0"], &["feat: x"]);

        let mut settings = settings();
        settings.increment_type = Some("release".to_string());
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert!(matches!(
            outcome,
            ReleaseOutcome::Skipped {
                reason: SkipReason::VersionUnchanged,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_promotion_without_releases_is_skipped() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases().returning(|| Ok(vec![]));
        host.expect_list_commits()
            .with(eq("abc123"))
            .returning(|_| Ok(commits(&["feat: second", "chore: init"])));
        host.expect_compare_commits().returning(|_, _| Ok(vec![]));

        let mut settings = settings();
        settings.increment_type = Some("Release".to_string());
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(
            outcome,
            ReleaseOutcome::Skipped {
                previous: None,
                reason: SkipReason::NothingToPromote,
            }
        );
    }

    #[tokio::test]
    async fn test_first_release_walks_history_from_root() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases().returning(|| Ok(vec![]));
        host.expect_list_commits()
            .returning(|_| Ok(commits(&["fix: newest", "chore: init"])));
        host.expect_compare_commits()
            .with(eq("sha1"), eq("abc123"))
            .times(1)
            .returning(|_, _| Ok(vec![RawCommit::new("sha0", "fix: newest")]));
        host.expect_get_file_content().returning(|_, _| Ok(None));
        host.expect_get_release_by_tag().returning(|_| Ok(None));
        host.expect_get_release_by_name().returning(|_| Ok(None));
        expect_created(&mut host);

        let outcome = run_release(&settings(), &host, &clock()).await.unwrap();
        assert_eq!(outcome.previous(), None);
        assert_eq!(outcome.incremented().unwrap().to_string(), "0.0.1");
    }

    #[tokio::test]
    async fn test_calver_first_release_of_month() {
        let mut host = host_with(&["v2024.05.3"], &["chore: anything"]);
        expect_created(&mut host);

        let mut settings = settings();
        settings.versioning = "calver".to_string();
        settings.prefix = Some("v".to_string());
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(outcome.incremented().unwrap().to_string(), "v2024.06.0");
    }

    #[tokio::test]
    async fn test_calver_first_release_without_history() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases().returning(|| Ok(vec![]));
        host.expect_list_commits()
            .returning(|_| Ok(commits(&["chore: init"])));
        host.expect_compare_commits().returning(|_, _| Ok(vec![]));
        host.expect_get_file_content().returning(|_, _| Ok(None));
        host.expect_get_release_by_tag().returning(|_| Ok(None));
        host.expect_get_release_by_name().returning(|_| Ok(None));
        expect_created(&mut host);

        let mut settings = settings();
        settings.versioning = "calver".to_string();
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(outcome.previous(), None);
        assert_eq!(outcome.incremented().unwrap().to_string(), "2024.06.1");
    }

    #[tokio::test]
    async fn test_calver_same_month_bumps_micro() {
        let mut host = host_with(&["2024.06.1"], &["chore: anything"]);
        expect_created(&mut host);

        let mut settings = settings();
        settings.versioning = "calver".to_string();
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        assert_eq!(outcome.incremented().unwrap().to_string(), "2024.06.2");
    }

    #[tokio::test]
    async fn test_existing_draft_is_not_duplicated() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases()
            .returning(|| Ok(vec![release(1, "1.2.3")]));
        host.expect_compare_commits()
            .returning(|_, _| Ok(commits(&["fix: bug"])));
        host.expect_get_release_by_tag()
            .with(eq("1.2.4"))
            .returning(|_| Ok(None));
        host.expect_get_release_by_name()
            .with(eq("1.2.4"))
            .returning(|_| {
                let mut draft = release(2, "untagged-123");
                draft.name = Some("1.2.4".to_string());
                draft.draft = true;
                Ok(Some(draft))
            });

        let outcome = run_release(&settings(), &host, &clock()).await.unwrap();
        assert!(matches!(
            outcome,
            ReleaseOutcome::Skipped {
                reason: SkipReason::AlreadyReleased,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_dry_run_creates_nothing() {
        let host = host_with(&["1.2.3"], &["fix: bug"]);

        let mut settings = settings();
        settings.dry_run = true;
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        match outcome {
            ReleaseOutcome::DryRun {
                version, changelog, ..
            } => {
                assert_eq!(version.to_string(), "1.2.4");
                assert_eq!(changelog, "## What's Changed\n\n### Bug Fixes\n- Bug");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repository_configuration_is_used() {
        let mut host = MockReleaseHost::new();
        host.expect_list_releases()
            .returning(|| Ok(vec![release(1, "1.0.0")]));
        host.expect_compare_commits()
            .returning(|_, _| Ok(commits(&["fix: bug", "docs(api): describe"])));
        host.expect_get_release_by_tag().returning(|_| Ok(None));
        host.expect_get_release_by_name().returning(|_| Ok(None));
        host.expect_get_file_content()
            .with(eq(".github/release.yml"), eq("abc123"))
            .returning(|_, _| {
                Ok(Some(
                    b"changelog:\n  categories:\n    - title: Docs\n      types: [docs]\n".to_vec(),
                ))
            });

        let mut settings = settings();
        settings.dry_run = true;
        let outcome = run_release(&settings, &host, &clock()).await.unwrap();
        match outcome {
            ReleaseOutcome::DryRun { changelog, .. } => {
                assert_eq!(changelog, "## What's Changed\n\n### Docs\n- Describe");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsupported_increment_type_is_fatal() {
        let host = host_with(&["1.0.0"], &["fix: x"]);

        let mut settings = settings();
        settings.increment_type = Some("minor|calendar".to_string());
        let result = run_release(&settings, &host, &clock()).await;
        assert!(matches!(result, Err(ReleaseError::Version(_))));
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_fatal() {
        let host = MockReleaseHost::new();
        let mut settings = settings();
        settings.versioning = "romver".to_string();
        let result = run_release(&settings, &host, &clock()).await;
        assert!(matches!(result, Err(ReleaseError::Version(_))));
    }
}

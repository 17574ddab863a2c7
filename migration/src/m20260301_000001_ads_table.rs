use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 ads 表
        manager
            .create_table(
                Table::create()
                    .table(Ad::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ad::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Ad::Platform).string_len(16).not_null())
                    .col(ColumnDef::new(Ad::AdvertiserName).string().not_null())
                    .col(ColumnDef::new(Ad::Headline).text().not_null())
                    .col(ColumnDef::new(Ad::BodyText).text().not_null())
                    .col(ColumnDef::new(Ad::MediaType).string_len(16).not_null())
                    .col(ColumnDef::new(Ad::MediaUrls).text().not_null())
                    .col(ColumnDef::new(Ad::CtaLabel).string().null())
                    .col(ColumnDef::new(Ad::LandingUrl).text().null())
                    .col(ColumnDef::new(Ad::Country).string_len(8).not_null())
                    .col(ColumnDef::new(Ad::Language).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Ad::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ad::FirstSeenAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ad::LastSeenAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ad::EstImpressions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Ad::SpendBracket).string_len(8).not_null())
                    .col(ColumnDef::new(Ad::Likes).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Ad::Comments)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Ad::Shares).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Ad::PredictedCtr).double().null())
                    .col(ColumnDef::new(Ad::PredictedCvr).double().null())
                    .col(ColumnDef::new(Ad::Vertical).string().not_null())
                    .col(ColumnDef::new(Ad::Tags).text().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建时间索引（latest 排序）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ads_created_at")
                    .table(Ad::Table)
                    .col(Ad::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ads_platform_country")
                    .table(Ad::Table)
                    .col(Ad::Platform)
                    .col(Ad::Country)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_ads_platform_country").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_ads_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Ad::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ad {
    #[sea_orm(iden = "ads")]
    Table,
    Id,
    Platform,
    AdvertiserName,
    Headline,
    BodyText,
    MediaType,
    MediaUrls,
    CtaLabel,
    LandingUrl,
    Country,
    Language,
    CreatedAt,
    FirstSeenAt,
    LastSeenAt,
    EstImpressions,
    SpendBracket,
    Likes,
    Comments,
    Shares,
    PredictedCtr,
    PredictedCvr,
    Vertical,
    Tags,
}

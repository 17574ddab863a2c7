use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorite::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorite::UserId).string().not_null())
                    .col(ColumnDef::new(Favorite::TargetType).string_len(16).not_null())
                    .col(ColumnDef::new(Favorite::TargetId).string().not_null())
                    .col(ColumnDef::new(Favorite::Note).text().null())
                    .col(
                        ColumnDef::new(Favorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个 (user, type, target) 只允许一条收藏
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_favorites_user_target")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .col(Favorite::TargetType)
                    .col(Favorite::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 全局收藏计数按 (type, target) 查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_target")
                    .table(Favorite::Table)
                    .col(Favorite::TargetType)
                    .col(Favorite::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_favorites_target").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("uq_favorites_user_target").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Favorite::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Favorite {
    #[sea_orm(iden = "favorites")]
    Table,
    Id,
    UserId,
    TargetType,
    TargetId,
    Note,
    CreatedAt,
}

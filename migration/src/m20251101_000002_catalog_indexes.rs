use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 分类页与热门列表按点击量排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_services_category_clicks")
                    .table(Service::Table)
                    .col(Service::CategoryId)
                    .col(Service::ClickCount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_services_click_count")
                    .table(Service::Table)
                    .col(Service::ClickCount)
                    .to_owned(),
            )
            .await?;

        // 按标签反查服务
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_tags_tag_id")
                    .table(ServiceTag::Table)
                    .col(ServiceTag::TagId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_categories_sort_order")
                    .table(Category::Table)
                    .col(Category::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_banners_active_sort")
                    .table(Banner::Table)
                    .col(Banner::IsActive)
                    .col(Banner::SortOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_banners_active_sort")
                    .table(Banner::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_categories_sort_order")
                    .table(Category::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_tags_tag_id")
                    .table(ServiceTag::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_services_click_count")
                    .table(Service::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_services_category_clicks")
                    .table(Service::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Service {
    #[sea_orm(iden = "services")]
    Table,
    CategoryId,
    ClickCount,
}

#[derive(DeriveIden)]
enum ServiceTag {
    #[sea_orm(iden = "service_tags")]
    Table,
    TagId,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    SortOrder,
}

#[derive(DeriveIden)]
enum Banner {
    #[sea_orm(iden = "banners")]
    Table,
    IsActive,
    SortOrder,
}
